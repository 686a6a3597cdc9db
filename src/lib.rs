//! typesort - sort the files of a directory into type-named subfolders
//!
//! Files are classified either by sniffing their content (Images, Videos,
//! Audio, Archives, Documents, Other) or by their extension (PNG, TXT, NoExt)
//! and moved into a subfolder of that name. Runs can print, defer and log
//! every action and report counts and sizes per category.

pub mod cli;
pub mod config;
pub mod demo;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod reporter;
pub mod stats;

pub use config::{ConfigError, RunConfig, Settings, SkipRules};
pub use file_category::{Category, ClassifyMode, FileKind, classify};
pub use file_organizer::{OrganizeError, Organizer};
pub use output::Message;
pub use reporter::Reporter;
pub use stats::{Stats, humanize_bytes};

pub use cli::{Cli, run_cli};
