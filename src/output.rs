//! Output formatting and styling module.
//!
//! Provides the run's [`Message`] type and a centralized [`OutputFormatter`]
//! for everything printed to the terminal, so styling is decided in one place
//! and `--no-color` only has to flip a single switch.

use colored::*;
use std::fmt;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// A single message produced during a run.
///
/// The level is fixed where the message is created; it decides how the
/// message is styled, never its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Info(String),
    Warning(String),
    Error(String),
}

impl Message {
    pub fn info(text: impl Into<String>) -> Self {
        Message::Info(text.into())
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Message::Warning(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        Message::Error(text.into())
    }

    pub fn level(&self) -> MessageLevel {
        match self {
            Message::Info(_) => MessageLevel::Info,
            Message::Warning(_) => MessageLevel::Warning,
            Message::Error(_) => MessageLevel::Error,
        }
    }

    /// The unstyled message text.
    pub fn text(&self) -> &str {
        match self {
            Message::Info(text) | Message::Warning(text) | Message::Error(text) => text,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Styled run messages (info, warning, error badges)
/// - Success messages (green with ✓)
/// - Section headers and separators
/// - The options block and the stats summary
pub struct OutputFormatter;

impl OutputFormatter {
    /// Turns colored output off for the rest of the process.
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Renders a message with the badge and color for its level.
    pub fn styled(message: &Message) -> String {
        match message.level() {
            MessageLevel::Info => {
                format!("{} {}", " INFO ".black().on_cyan(), message.text().cyan())
            }
            MessageLevel::Warning => format!(
                "{} {}",
                " WARNING ".black().on_yellow(),
                message.text().yellow()
            ),
            MessageLevel::Error => {
                format!("{} {}", " ERROR ".white().on_red(), message.text().red())
            }
        }
    }

    /// Prints a message immediately. Errors go to stderr.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use typesort::output::{Message, OutputFormatter};
    /// OutputFormatter::print(&Message::warning("Skipping empty file: a.txt"));
    /// ```
    pub fn print(message: &Message) {
        match message.level() {
            MessageLevel::Error => eprintln!("{}", Self::styled(message)),
            _ => println!("{}", Self::styled(message)),
        }
    }

    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message.green());
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dim horizontal rule.
    pub fn separator() {
        println!("{}", "─".repeat(32).bright_black());
    }

    /// Prints a titled block of lines.
    pub fn block(title: &str, lines: &[String]) {
        println!("{}", title.bright_cyan().bold());
        for line in lines {
            println!("  {}", line);
        }
    }

    /// A green ✔ or red ✖ for an option value.
    pub fn mark(enabled: bool) -> String {
        if enabled {
            "✔".bright_green().to_string()
        } else {
            "✖".bright_red().to_string()
        }
    }
}
