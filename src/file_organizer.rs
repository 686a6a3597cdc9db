//! Directory walk that moves files into category subfolders.
//!
//! An [`Organizer`] owns everything a single run mutates: the [`Reporter`]
//! buffers and the [`Stats`] counters. Construct a fresh one per run.

use crate::config::{RunConfig, SkipRules};
use crate::file_category;
use crate::reporter::Reporter;
use crate::stats::Stats;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The directory to organize does not exist or is not a directory.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A directory could not be listed.
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves the files of a directory into subfolders named after their category.
pub struct Organizer {
    config: RunConfig,
    skip_rules: SkipRules,
    reporter: Reporter,
    stats: Option<Stats>,
}

impl Organizer {
    pub fn new(config: RunConfig) -> Self {
        Self::with_skip_rules(config, SkipRules::default())
    }

    pub fn with_skip_rules(config: RunConfig, skip_rules: SkipRules) -> Self {
        let reporter = Reporter::from_config(&config);
        Self {
            config,
            skip_rules,
            reporter,
            stats: None,
        }
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut Reporter {
        &mut self.reporter
    }

    /// Counters for this run; `None` until a file is recorded with stats on.
    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    /// Hands the run's reporter and stats back to the caller.
    pub fn finish(self) -> (Reporter, Option<Stats>) {
        (self.reporter, self.stats)
    }

    /// Organizes `directory`, descending into subfolders if configured.
    ///
    /// Only a failure to list `directory` itself is returned. Every problem
    /// with an individual entry is reported and the walk moves on.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use typesort::config::RunConfig;
    /// use typesort::file_organizer::Organizer;
    /// use std::path::Path;
    ///
    /// let mut organizer = Organizer::new(RunConfig::default());
    /// match organizer.run(Path::new("/path/to/downloads")) {
    ///     Ok(()) => println!("Organized"),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn run(&mut self, directory: &Path) -> OrganizeResult<()> {
        if !directory.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: directory.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "not an existing directory",
                ),
            });
        }
        self.organize_directory(directory)
    }

    fn organize_directory(&mut self, directory: &Path) -> OrganizeResult<()> {
        let entries = list_entries(directory)?;

        self.reporter
            .info(format!("Organizing directory {}", directory.display()));
        self.reporter.info(format!("Found {} entries", entries.len()));

        let base_name = dir_base_name(directory);
        for entry in entries {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                self.visit_subdirectory(&entry);
            } else {
                self.organize_file(directory, base_name.as_deref(), &entry);
            }
        }

        Ok(())
    }

    fn visit_subdirectory(&mut self, entry: &DirEntry) {
        if !self.config.include_subfolders {
            return;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if file_category::is_output_folder(self.config.mode, &name) {
            return;
        }

        if let Err(e) = self.organize_directory(&entry.path()) {
            let path = entry.path();
            let reason = match e {
                OrganizeError::DirectoryReadFailed { source, .. } => source.to_string(),
                other => other.to_string(),
            };
            self.reporter.error(format!(
                "Error reading directory {}: {}",
                path.display(),
                reason
            ));
        }
    }

    /// Classifies and moves one file, reporting what happened.
    fn organize_file(
        &mut self,
        directory: &Path,
        base_name: Option<&str>,
        entry: &DirEntry,
    ) {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let file_path = entry.path();

        if self.skip_rules.skips(&file_name) {
            self.reporter
                .warning(format!("Skipping excluded file: {}", file_name));
            return;
        }

        let contents = match fs::read(&file_path) {
            Ok(contents) => contents,
            Err(e) => {
                self.reporter
                    .error(format!("Error reading file {}: {}", file_name, e));
                return;
            }
        };

        if contents.is_empty() {
            self.reporter
                .warning(format!("Skipping empty file: {}", file_name));
            return;
        }

        let category = file_category::classify(self.config.mode, &file_name, &contents);
        if base_name == Some(category.dir_name()) {
            return;
        }

        if self.config.stats {
            self.stats
                .get_or_insert_with(Stats::new)
                .record(category.dir_name(), contents.len() as u64);
        }

        let subfolder = directory.join(category.dir_name());
        if let Err(OrganizeError::DirectoryCreationFailed { path, source }) =
            self.ensure_subfolder(&subfolder)
        {
            self.reporter.error(format!(
                "Error creating subfolder {}: {}",
                path.display(),
                source
            ));
            return;
        }

        match move_into(&file_path, &subfolder) {
            Ok(_) => self.reporter.info(format!(
                "Moved file {} to {}",
                file_name,
                subfolder.display()
            )),
            Err(OrganizeError::FileMoveFailure { source_error, .. }) => self
                .reporter
                .error(format!("Error moving file {}: {}", file_name, source_error)),
            Err(e) => self
                .reporter
                .error(format!("Error moving file {}: {}", file_name, e)),
        }
    }

    /// Creates `subfolder` if it is missing and reports the creation.
    fn ensure_subfolder(&mut self, subfolder: &Path) -> OrganizeResult<()> {
        if subfolder.exists() {
            return Ok(());
        }
        fs::create_dir(subfolder).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: subfolder.to_path_buf(),
            source: e,
        })?;
        self.reporter
            .info(format!("Created subfolder {}", subfolder.display()));
        Ok(())
    }
}

/// Lists `directory` sorted by file name.
fn list_entries(directory: &Path) -> OrganizeResult<Vec<DirEntry>> {
    let read_failed = |source| OrganizeError::DirectoryReadFailed {
        path: directory.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(directory)
        .map_err(read_failed)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_failed)?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

/// Final path component of `directory`, resolving `.` and `..` if needed.
fn dir_base_name(directory: &Path) -> Option<String> {
    let name = match directory.file_name() {
        Some(name) => name.to_os_string(),
        None => fs::canonicalize(directory).ok()?.file_name()?.to_os_string(),
    };
    Some(name.to_string_lossy().into_owned())
}

/// Renames `file_path` into `folder`, keeping its file name.
///
/// Returns the new path of the file.
pub fn move_into(file_path: &Path, folder: &Path) -> OrganizeResult<PathBuf> {
    let file_name = file_path
        .file_name()
        .ok_or_else(|| OrganizeError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: folder.to_path_buf(),
            source_error: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "file has no name component",
            ),
        })?;

    let destination = folder.join(file_name);
    fs::rename(file_path, &destination).map_err(|e| OrganizeError::FileMoveFailure {
        source: file_path.to_path_buf(),
        destination: destination.clone(),
        source_error: e,
    })?;

    Ok(destination)
}
