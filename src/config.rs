//! Run configuration and the optional settings file.
//!
//! A run is driven by one immutable [`RunConfig`]. Its defaults can come
//! from a TOML settings file, which may also list files that must never be
//! touched:
//!
//! ```toml
//! [options]
//! include_subfolders = true
//! exact = false
//! detailed = false
//! log_file = "log.txt"
//!
//! [skip]
//! filenames = [".DS_Store", "Thumbs.db"]
//! extensions = ["part", "crdownload"]
//! patterns = ["*.tmp", "~$*"]
//! ```

use crate::file_category::ClassifyMode;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the settings file looked up in the working directory.
pub const LOCAL_SETTINGS_FILE: &str = ".typesortrc.toml";

/// Default location of the persisted log, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Default fixture tree copied by demo mode.
pub const DEFAULT_DEMO_SOURCE: &str = "base-dummy-files";

/// Errors that can occur while loading settings.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Settings file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern in the skip rules.
    InvalidGlobPattern(String),
    /// IO error while reading the settings file.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Settings file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid settings: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid skip pattern '{}'", pattern)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything one organizer run needs to know, fixed before the walk starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: ClassifyMode,
    pub include_subfolders: bool,
    pub verbose: bool,
    pub defer_output: bool,
    pub no_color: bool,
    pub log: bool,
    pub stats: bool,
    pub log_file: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mode: ClassifyMode::Content,
            include_subfolders: false,
            verbose: false,
            defer_output: false,
            no_color: false,
            log: false,
            stats: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl RunConfig {
    /// Switches on deferred output, logging and stats together.
    pub fn detailed(mut self) -> Self {
        self.defer_output = true;
        self.log = true;
        self.stats = true;
        self
    }

    pub fn is_exact(&self) -> bool {
        self.mode == ClassifyMode::Exact
    }
}

/// Contents of a settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub options: OptionDefaults,

    #[serde(default)]
    pub skip: SkipSettings,
}

/// Default values for the command-line switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionDefaults {
    #[serde(default)]
    pub include_subfolders: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub defer_output: bool,
    #[serde(default)]
    pub no_color: bool,
    #[serde(default)]
    pub log: bool,
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub stats: bool,
    #[serde(default)]
    pub detailed: bool,
    /// Where the log is written, defaults to [`DEFAULT_LOG_FILE`].
    pub log_file: Option<PathBuf>,
    /// Fixture tree for demo mode, defaults to [`DEFAULT_DEMO_SOURCE`].
    pub demo_source: Option<PathBuf>,
}

/// Files that are reported and left alone instead of being organized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkipSettings {
    /// Exact file names.
    #[serde(default)]
    pub filenames: Vec<String>,
    /// Extensions without the dot, case-insensitive.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Glob patterns matched against the file name.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Settings {
    /// Load settings, falling back to defaults.
    ///
    /// Looks in the following order:
    /// 1. `settings_path`, if provided
    /// 2. `.typesortrc.toml` in the current directory
    /// 3. `~/.config/typesort/config.toml`
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file is explicitly provided but cannot be
    /// read, or if any file found is not valid TOML.
    pub fn load(settings_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = settings_path {
            return Self::load_from_file(path);
        }

        let local = PathBuf::from(LOCAL_SETTINGS_FILE);
        if local.exists() {
            return Self::load_from_file(&local);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_settings = PathBuf::from(home)
                .join(".config")
                .join("typesort")
                .join("config.toml");
            if home_settings.exists() {
                return Self::load_from_file(&home_settings);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::parse(&content)
    }

    /// Parses settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    pub fn log_file(&self) -> PathBuf {
        self.options
            .log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    pub fn demo_source(&self) -> PathBuf {
        self.options
            .demo_source
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEMO_SOURCE))
    }
}

/// Compiled skip rules, checked once per file.
#[derive(Debug, Clone, Default)]
pub struct SkipRules {
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl SkipRules {
    /// Compiles the skip section of a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is invalid.
    pub fn compile(settings: &SkipSettings) -> Result<Self, ConfigError> {
        let patterns = settings
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            filenames: settings.filenames.iter().cloned().collect(),
            extensions: settings
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            patterns,
        })
    }

    /// Returns true if a file called `file_name` must be left alone.
    pub fn skips(&self, file_name: &str) -> bool {
        if self.filenames.contains(file_name) {
            return true;
        }

        if let Some((_, ext)) = file_name.rsplit_once('.')
            && self.extensions.contains(&ext.to_lowercase())
        {
            return true;
        }

        self.patterns.iter().any(|pattern| pattern.matches(file_name))
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty() && self.extensions.is_empty() && self.patterns.is_empty()
    }
}
