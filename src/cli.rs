//! Command-line interface module for typesort.
//!
//! This module handles all CLI-related functionality including:
//! - Flag parsing and merging with the settings file
//! - Demo directory preparation
//! - The options banner
//! - Driving one organizer run and the end-of-run output

use crate::config::{RunConfig, Settings, SkipRules};
use crate::demo::{self, DEFAULT_DEMO_TARGET};
use crate::file_category::ClassifyMode;
use crate::file_organizer::{OrganizeError, Organizer};
use crate::output::OutputFormatter;
use crate::reporter::Reporter;
use crate::stats::Stats;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Sort the files of a directory into type-named subfolders.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "typesort", version, about)]
pub struct Cli {
    /// The directory to organize.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Include subfolders in the organization.
    #[arg(short, long)]
    pub include_subfolders: bool,

    /// Print every action as it happens.
    #[arg(short, long)]
    pub verbose: bool,

    /// Collect messages and print them after the run.
    #[arg(long)]
    pub defer_output: bool,

    /// Disable colored terminal output.
    #[arg(long)]
    pub no_color: bool,

    /// Save a log of operations.
    #[arg(long)]
    pub log: bool,

    /// Organize by file extension instead of content.
    #[arg(short, long)]
    pub exact: bool,

    /// Print file counts and sizes per category.
    #[arg(long)]
    pub stats: bool,

    /// Shorthand for --defer-output --log --stats.
    #[arg(long)]
    pub detailed: bool,

    /// Organize a fresh copy of the demo fixtures.
    #[arg(long)]
    pub demo: bool,

    /// Path to a settings file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Combines the flags with the settings file defaults. A flag can only
    /// switch an option on.
    pub fn run_config(&self, settings: &Settings) -> RunConfig {
        let defaults = &settings.options;
        let exact = self.exact || defaults.exact;

        let config = RunConfig {
            mode: if exact {
                ClassifyMode::Exact
            } else {
                ClassifyMode::Content
            },
            include_subfolders: self.include_subfolders || defaults.include_subfolders,
            verbose: self.verbose || defaults.verbose,
            defer_output: self.defer_output || defaults.defer_output,
            no_color: self.no_color || defaults.no_color,
            log: self.log || defaults.log,
            stats: self.stats || defaults.stats,
            log_file: settings.log_file(),
        };

        if self.detailed || defaults.detailed {
            config.detailed()
        } else {
            config
        }
    }

    /// The directory to organize, falling back to the demo target in demo mode.
    /// An empty `--dir` counts as not given.
    pub fn target_dir(&self) -> Option<PathBuf> {
        let dir = self.dir.as_ref().filter(|dir| !dir.as_os_str().is_empty());
        match (dir, self.demo) {
            (Some(dir), _) => Some(dir.clone()),
            (None, true) => Some(PathBuf::from(DEFAULT_DEMO_TARGET)),
            (None, false) => None,
        }
    }
}

/// Runs the CLI application with parsed arguments.
///
/// Returns an error only when the run could not start or the top-level
/// directory could not be read. Problems with single files are reported
/// and do not fail the run.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use typesort::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["typesort", "--dir", "/path/to/downloads", "--stats"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    let settings = Settings::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading settings: {}", e))?;
    let skip_rules =
        SkipRules::compile(&settings.skip).map_err(|e| format!("Error in skip rules: {}", e))?;

    let config = cli.run_config(&settings);
    if config.no_color {
        OutputFormatter::disable_color();
    }

    let directory = cli
        .target_dir()
        .ok_or_else(|| "The directory to organize is required.".to_string())?;

    let mut organizer = Organizer::with_skip_rules(config.clone(), skip_rules);

    if cli.demo {
        let source = settings.demo_source();
        let reporter = organizer.reporter_mut();
        match demo::prepare(&source, &directory) {
            Ok(()) => reporter.info(format!(
                "Prepared demo folder '{}' from {}",
                directory.display(),
                source.display()
            )),
            Err(e) => reporter.error(format!("Error preparing demo folder: {}", e)),
        }
    }

    print_options(&directory, &config);
    organizer
        .reporter_mut()
        .log_only(&options_log_line(&directory, &config));

    let outcome = organizer.run(&directory);
    let (mut reporter, stats) = organizer.finish();

    if let Err(e) = outcome {
        let reason = match e {
            OrganizeError::DirectoryReadFailed { source, .. }
            | OrganizeError::InvalidBasePath { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        let message = format!(
            "Error: Failed to read directory {}: {}",
            directory.display(),
            reason
        );
        reporter.log_only(&message);
        save_log(&reporter, &config.log_file);
        return Err(message);
    }

    OutputFormatter::success("Organization complete.");
    reporter.log_only("Organization complete.");

    if config.defer_output {
        OutputFormatter::separator();
        reporter.flush_deferred();
    }

    if config.stats {
        OutputFormatter::separator();
        print_stats(&mut reporter, &stats.unwrap_or_default());
    }

    save_log(&reporter, &config.log_file);
    Ok(())
}

/// Lines of the options banner.
pub fn options_lines(directory: &Path, config: &RunConfig) -> Vec<String> {
    let mark = OutputFormatter::mark;
    vec![
        format!("Directory: {}", directory.display()),
        format!("Include subfolders {}", mark(config.include_subfolders)),
        format!("Verbose {}", mark(config.verbose)),
        format!("Defer output {}", mark(config.defer_output)),
        format!("No color {}", mark(config.no_color)),
        format!("Log {}", mark(config.log)),
        format!("Exact {}", mark(config.is_exact())),
        format!("Stats {}", mark(config.stats)),
    ]
}

/// The options banner as a single log line.
pub fn options_log_line(directory: &Path, config: &RunConfig) -> String {
    format!(
        "Options => Directory: {} | Include subfolders: {} | Verbose: {} | Defer output: {} | No color: {} | Log: {} | Exact: {} | Stats: {}",
        directory.display(),
        config.include_subfolders,
        config.verbose,
        config.defer_output,
        config.no_color,
        config.log,
        config.is_exact(),
        config.stats
    )
}

fn print_options(directory: &Path, config: &RunConfig) {
    OutputFormatter::header("typesort");
    OutputFormatter::block("Options", &options_lines(directory, config));
}

/// Prints the stats block and mirrors it into the log.
fn print_stats(reporter: &mut Reporter, stats: &Stats) {
    let summary = stats.summarize();

    let mut lines = vec![
        format!("Total files: {}", summary.total_files),
        format!("Total size: {}", summary.total_size),
        String::new(),
        "Breakdown by type:".to_string(),
    ];
    lines.extend(summary.breakdown.iter().map(|line| format!("- {}", line)));
    OutputFormatter::block("Stats Summary", &lines);

    reporter.log_only(&format!(
        "Stats => Total files: {} | Total size: {}",
        summary.total_files, summary.total_size
    ));
    for line in &summary.breakdown {
        reporter.log_only(&format!("Stats Type => {}", line));
    }
}

/// Persists the log if logging is on. A failed write is reported, not fatal.
fn save_log(reporter: &Reporter, log_file: &Path) {
    if !reporter.is_logging() {
        return;
    }
    match reporter.write_log(log_file) {
        Ok(()) => OutputFormatter::success(&format!("Log saved to {}", log_file.display())),
        Err(e) => OutputFormatter::error(&format!(
            "Could not save log to {}: {}",
            log_file.display(),
            e
        )),
    }
}
