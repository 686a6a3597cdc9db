//! Routing of run messages to the terminal, the deferred buffer and the log.
//!
//! Each of the three sinks is switched on independently, so one call to
//! [`Reporter::emit`] can print, buffer and log the same message.

use crate::config::RunConfig;
use crate::output::{Message, OutputFormatter};
use std::fs;
use std::io;
use std::path::Path;

/// Format used for log line timestamps.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current local time as used in log lines.
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Collects and dispatches messages for a single run.
#[derive(Debug, Default)]
pub struct Reporter {
    verbose: bool,
    defer_output: bool,
    log: bool,
    deferred: Vec<Message>,
    log_lines: Vec<String>,
}

impl Reporter {
    pub fn new(verbose: bool, defer_output: bool, log: bool) -> Self {
        Self {
            verbose,
            defer_output,
            log,
            ..Self::default()
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.verbose, config.defer_output, config.log)
    }

    /// Prints, buffers and logs `message` according to the enabled sinks.
    pub fn emit(&mut self, message: Message) {
        if self.verbose {
            OutputFormatter::print(&message);
        }
        if self.log {
            self.log_lines
                .push(format!("{} {}", timestamp(), message.text()));
        }
        if self.defer_output {
            self.deferred.push(message);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.emit(Message::info(text));
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.emit(Message::warning(text));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.emit(Message::error(text));
    }

    /// Appends a timestamped line to the log only. No-op when logging is off.
    pub fn log_only(&mut self, text: &str) {
        if self.log {
            self.log_lines.push(format!("{} {}", timestamp(), text));
        }
    }

    pub fn is_logging(&self) -> bool {
        self.log
    }

    /// Messages waiting for [`Reporter::flush_deferred`], in emission order.
    pub fn deferred(&self) -> &[Message] {
        &self.deferred
    }

    /// Log lines collected so far, in emission order.
    pub fn log_lines(&self) -> &[String] {
        &self.log_lines
    }

    /// Prints every deferred message in emission order and empties the buffer.
    pub fn flush_deferred(&mut self) {
        for message in self.deferred.drain(..) {
            println!("{}", OutputFormatter::styled(&message));
        }
    }

    /// Writes the log to `path`, replacing any previous content.
    pub fn write_log(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.log_lines.join("\n"))
    }
}
