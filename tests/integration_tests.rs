//! Integration tests for typesort
//!
//! These tests run the organizer and the CLI against real temporary
//! directories and check the resulting tree, messages, stats and log.
//!
//! Test categories:
//! 1. Content-sniffing organization
//! 2. Exact (extension) organization
//! 3. Skipped and failing entries
//! 4. Subfolders and idempotence
//! 5. Stats
//! 6. CLI runs with logging

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use typesort::cli::{Cli, run_cli};
use typesort::config::RunConfig;
use typesort::file_category::ClassifyMode;
use typesort::file_organizer::Organizer;
use typesort::output::MessageLevel;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory with helpers to build and inspect a file tree.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file with content, creating parent folders as needed.
    fn create_file(&self, rel_path: &str, content: &[u8]) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content)
            .expect("Failed to write file content");
    }

    fn create_files(&self, files: &[(&str, &[u8])]) {
        for (name, content) in files {
            self.create_file(name, content);
        }
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    /// Count regular files directly in the fixture root.
    fn count_root_files(&self) -> usize {
        fs::read_dir(self.path())
            .expect("Failed to read directory")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .count()
    }

    /// All files below the fixture root, relative and sorted.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), &mut files);
        let mut relative: Vec<_> = files
            .into_iter()
            .map(|p| p.strip_prefix(self.path()).unwrap().to_path_buf())
            .collect();
        relative.sort();
        relative
    }

    fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    files.push(path);
                } else if path.is_dir() {
                    Self::walk_dir(&path, files);
                }
            }
        }
    }
}

/// Config that keeps every message and the stats for inspection.
fn inspect_config(mode: ClassifyMode, include_subfolders: bool) -> RunConfig {
    RunConfig {
        mode,
        include_subfolders,
        defer_output: true,
        stats: true,
        ..RunConfig::default()
    }
}

fn run(fixture: &TestFixture, config: RunConfig) -> Organizer {
    let mut organizer = Organizer::new(config);
    organizer
        .run(fixture.path())
        .expect("Top-level directory should be readable");
    organizer
}

fn messages_with(organizer: &Organizer, prefix: &str) -> Vec<String> {
    organizer
        .reporter()
        .deferred()
        .iter()
        .map(|m| m.text().to_string())
        .filter(|text| text.starts_with(prefix))
        .collect()
}

// ============================================================================
// Test Data: Realistic File Content
// ============================================================================

/// PNG file header (minimal, just enough to be detected as PNG)
const PNG_HEADER: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 image
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, // bit depth, color
    0xDE,
];

/// JPEG file header (minimal)
const JPEG_HEADER: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, // JPEG SOI and APP0 marker
    0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, // JFIF signature
    0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
];

/// ZIP local file header (minimal)
const ZIP_HEADER: &[u8] = &[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x00, 0x00];

/// MP3 frame sync (minimal)
const MP3_HEADER: &[u8] = &[0xFF, 0xFB, 0x10, 0x00];

/// Undetectable binary data
const BINARY_BLOB: &[u8] = &[0x00, 0x13, 0x37, 0x00, 0xFE, 0xED];

const NOTES: &[u8] = b"Remember to water the plants.\n";

const EMPTY: &[u8] = b"";

// ============================================================================
// Test Suite 1: Content-Sniffing Organization
// ============================================================================

#[test]
fn test_photo_and_notes_by_content() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("photo.jpg", JPEG_HEADER), ("notes.txt", NOTES)]);

    let organizer = run(&fixture, inspect_config(ClassifyMode::Content, false));

    fixture.assert_file_exists("Images/photo.jpg");
    fixture.assert_file_exists("Documents/notes.txt");
    assert_eq!(fixture.count_root_files(), 0);

    let stats = organizer.stats().expect("Stats should be collected");
    let images = stats.category("Images").expect("Images recorded");
    let documents = stats.category("Documents").expect("Documents recorded");
    assert_eq!((images.count, images.bytes), (1, JPEG_HEADER.len() as u64));
    assert_eq!((documents.count, documents.bytes), (1, NOTES.len() as u64));
}

#[test]
fn test_mixed_content_types() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("screenshot.png", PNG_HEADER),
        ("bundle.zip", ZIP_HEADER),
        ("song.mp3", MP3_HEADER),
        ("mystery.bin", BINARY_BLOB),
        // The name lies; the bytes win.
        ("actually_png.txt", PNG_HEADER),
    ]);

    run(&fixture, inspect_config(ClassifyMode::Content, false));

    fixture.assert_file_exists("Images/screenshot.png");
    fixture.assert_file_exists("Images/actually_png.txt");
    fixture.assert_file_exists("Archives/bundle.zip");
    fixture.assert_file_exists("Audio/song.mp3");
    fixture.assert_file_exists("Other/mystery.bin");
    assert_eq!(fixture.count_root_files(), 0);
}

#[test]
fn test_move_and_creation_messages() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("a.png", PNG_HEADER), ("b.png", PNG_HEADER)]);

    let organizer = run(&fixture, inspect_config(ClassifyMode::Content, false));

    let images = fixture.path().join("Images");
    assert_eq!(
        messages_with(&organizer, "Created subfolder"),
        vec![format!("Created subfolder {}", images.display())]
    );
    assert_eq!(
        messages_with(&organizer, "Moved file"),
        vec![
            format!("Moved file a.png to {}", images.display()),
            format!("Moved file b.png to {}", images.display()),
        ]
    );
}

// ============================================================================
// Test Suite 2: Exact Mode
// ============================================================================

#[test]
fn test_photo_and_notes_by_extension() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("photo.jpg", JPEG_HEADER), ("notes.txt", NOTES)]);

    run(&fixture, inspect_config(ClassifyMode::Exact, false));

    fixture.assert_file_exists("JPG/photo.jpg");
    fixture.assert_file_exists("TXT/notes.txt");
    fixture.assert_not_exists("Images");
    fixture.assert_not_exists("Documents");
}

#[test]
fn test_exact_mode_trusts_extension_and_handles_missing_ones() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("actually_png.txt", PNG_HEADER),
        ("LICENSE", NOTES),
        ("Archive.Tar.GZ", ZIP_HEADER),
    ]);

    let organizer = run(&fixture, inspect_config(ClassifyMode::Exact, false));

    fixture.assert_file_exists("TXT/actually_png.txt");
    fixture.assert_file_exists("NoExt/LICENSE");
    fixture.assert_file_exists("GZ/Archive.Tar.GZ");

    let stats = organizer.stats().expect("Stats should be collected");
    assert_eq!(stats.category("NoExt").map(|t| t.count), Some(1));
}

// ============================================================================
// Test Suite 3: Skipped and Failing Entries
// ============================================================================

#[test]
fn test_empty_file_is_skipped() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("empty.dat", EMPTY), ("notes.txt", NOTES)]);

    let organizer = run(&fixture, inspect_config(ClassifyMode::Content, false));

    fixture.assert_file_exists("empty.dat");
    fixture.assert_not_exists("Other");
    let skipped: Vec<_> = organizer
        .reporter()
        .deferred()
        .iter()
        .filter(|m| m.text() == "Skipping empty file: empty.dat")
        .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].level(), MessageLevel::Warning);

    let stats = organizer.stats().expect("Stats should be collected");
    assert_eq!(stats.total_count(), 1);
    assert_eq!(stats.total_bytes(), NOTES.len() as u64);
}

#[test]
fn test_only_empty_files_leave_no_stats() {
    let fixture = TestFixture::new();
    fixture.create_file("empty.dat", EMPTY);

    let organizer = run(&fixture, inspect_config(ClassifyMode::Exact, false));

    fixture.assert_file_exists("empty.dat");
    fixture.assert_not_exists("DAT");
    assert!(organizer.stats().is_none());
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_reported_and_walk_continues() {
    let fixture = TestFixture::new();
    std::os::unix::fs::symlink(
        fixture.path().join("gone.png"),
        fixture.path().join("broken.png"),
    )
    .expect("Failed to create symlink");
    fixture.create_file("notes.txt", NOTES);

    let organizer = run(&fixture, inspect_config(ClassifyMode::Content, false));

    assert!(
        fixture
            .path()
            .join("broken.png")
            .symlink_metadata()
            .is_ok()
    );
    fixture.assert_not_exists("Images");
    fixture.assert_file_exists("Documents/notes.txt");

    let errors = messages_with(&organizer, "Error reading file broken.png");
    assert_eq!(errors.len(), 1);
    let level = organizer
        .reporter()
        .deferred()
        .iter()
        .find(|m| m.text() == errors[0])
        .map(|m| m.level());
    assert_eq!(level, Some(MessageLevel::Error));
}

#[test]
fn test_missing_directory_is_fatal() {
    let fixture = TestFixture::new();
    let mut organizer = Organizer::new(RunConfig::default());

    let result = organizer.run(&fixture.path().join("does-not-exist"));
    assert!(result.is_err());
}

// ============================================================================
// Test Suite 4: Subfolders and Idempotence
// ============================================================================

#[test]
fn test_subfolders_ignored_by_default() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("inbox/photo.png", PNG_HEADER), ("notes.txt", NOTES)]);

    run(&fixture, inspect_config(ClassifyMode::Content, false));

    fixture.assert_file_exists("inbox/photo.png");
    fixture.assert_not_exists("inbox/Images");
    fixture.assert_file_exists("Documents/notes.txt");
}

#[test]
fn test_subfolders_organized_in_place_when_enabled() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("inbox/photo.png", PNG_HEADER),
        ("inbox/deeper/song.mp3", MP3_HEADER),
    ]);

    run(&fixture, inspect_config(ClassifyMode::Content, true));

    fixture.assert_file_exists("inbox/Images/photo.png");
    fixture.assert_file_exists("inbox/deeper/Audio/song.mp3");
    fixture.assert_not_exists("Images");
}

#[test]
fn test_existing_category_folder_is_not_descended() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("Images/old.png", PNG_HEADER), ("Images/readme.txt", NOTES)]);

    let organizer = run(&fixture, inspect_config(ClassifyMode::Content, true));

    fixture.assert_file_exists("Images/old.png");
    // Would have become Images/Documents/readme.txt if Images were descended.
    fixture.assert_file_exists("Images/readme.txt");
    assert!(messages_with(&organizer, "Moved file").is_empty());
    assert_eq!(messages_with(&organizer, "Organizing directory").len(), 1);
}

#[test]
fn test_exact_folders_are_not_descended() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("PNG/old.png", PNG_HEADER),
        ("NoExt/README", NOTES),
        ("7Z/readme.txt", NOTES),
        ("Photos/new.png", PNG_HEADER),
    ]);

    run(&fixture, inspect_config(ClassifyMode::Exact, true));

    fixture.assert_file_exists("PNG/old.png");
    fixture.assert_file_exists("NoExt/README");
    fixture.assert_file_exists("7Z/readme.txt");
    fixture.assert_file_exists("Photos/PNG/new.png");
}

#[test]
fn test_content_run_descends_into_exact_looking_folders() {
    let fixture = TestFixture::new();
    fixture.create_file("PNG/old.png", PNG_HEADER);

    run(&fixture, inspect_config(ClassifyMode::Content, true));

    fixture.assert_file_exists("PNG/Images/old.png");
}

#[test]
fn test_second_run_moves_nothing() {
    for mode in [ClassifyMode::Content, ClassifyMode::Exact] {
        let fixture = TestFixture::new();
        fixture.create_files(&[
            ("photo.jpg", JPEG_HEADER),
            ("notes.txt", NOTES),
            ("bundle.zip", ZIP_HEADER),
            ("sub/song.mp3", MP3_HEADER),
        ]);

        let first = run(&fixture, inspect_config(mode, true));
        assert_eq!(messages_with(&first, "Moved file").len(), 4);
        let tree = fixture.list_files_recursive();

        let second = run(&fixture, inspect_config(mode, true));
        assert!(
            messages_with(&second, "Moved file").is_empty(),
            "{:?} run should be idempotent",
            mode
        );
        assert_eq!(fixture.list_files_recursive(), tree);
    }
}

// ============================================================================
// Test Suite 5: Stats
// ============================================================================

#[test]
fn test_stats_categories_sum_to_totals() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        ("a.png", PNG_HEADER),
        ("b.jpg", JPEG_HEADER),
        ("c.zip", ZIP_HEADER),
        ("d.txt", NOTES),
        ("e.bin", BINARY_BLOB),
        ("nested/f.mp3", MP3_HEADER),
    ]);

    let organizer = run(&fixture, inspect_config(ClassifyMode::Content, true));
    let stats = organizer.stats().expect("Stats should be collected");

    let count: u64 = stats.categories().map(|(_, t)| t.count).sum();
    let bytes: u64 = stats.categories().map(|(_, t)| t.bytes).sum();
    assert_eq!(stats.total_count(), 6);
    assert_eq!(count, stats.total_count());
    assert_eq!(bytes, stats.total_bytes());
    assert_eq!(stats.category("Images").map(|t| t.count), Some(2));
}

#[test]
fn test_stats_off_collects_nothing() {
    let fixture = TestFixture::new();
    fixture.create_file("a.png", PNG_HEADER);

    let config = RunConfig {
        stats: false,
        ..inspect_config(ClassifyMode::Content, false)
    };
    let organizer = run(&fixture, config);

    fixture.assert_file_exists("Images/a.png");
    assert!(organizer.stats().is_none());
}

// ============================================================================
// Test Suite 6: CLI Runs With Logging
// ============================================================================

/// Writes a settings file that points the log into the fixture's parent.
fn settings_with_log(log_dir: &TempDir) -> (PathBuf, PathBuf) {
    let log_file = log_dir.path().join("run.log");
    let settings = log_dir.path().join("settings.toml");
    fs::write(
        &settings,
        format!(
            "[options]\nlog_file = {:?}\n",
            log_file.to_string_lossy().to_string()
        ),
    )
    .expect("Failed to write settings");
    (settings, log_file)
}

#[test]
fn test_cli_detailed_run_writes_log() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("photo.jpg", JPEG_HEADER), ("empty.dat", EMPTY)]);
    let log_dir = TempDir::new().expect("Failed to create temp directory");
    let (settings, log_file) = settings_with_log(&log_dir);

    let cli = Cli {
        dir: Some(fixture.path().to_path_buf()),
        detailed: true,
        no_color: true,
        config: Some(settings),
        ..Cli::default()
    };
    run_cli(&cli).expect("Run should succeed");

    fixture.assert_file_exists("Images/photo.jpg");
    let log = fs::read_to_string(&log_file).expect("Log should be written");
    let lines: Vec<_> = log.lines().collect();

    assert!(lines[0].contains(" Options => Directory: "));
    assert!(lines[0].contains("| Stats: true"));
    assert!(log.contains(" Skipping empty file: empty.dat"));
    assert!(log.contains(" Moved file photo.jpg to "));
    assert!(log.contains(" Organization complete."));
    assert!(log.contains(" Stats => Total files: 1 | Total size: "));
    assert!(log.contains(" Stats Type => Images: 1 files, "));
    assert!(!log.ends_with('\n'));
}

#[test]
fn test_cli_log_is_overwritten_each_run() {
    let fixture = TestFixture::new();
    fixture.create_file("notes.txt", NOTES);
    let log_dir = TempDir::new().expect("Failed to create temp directory");
    let (settings, log_file) = settings_with_log(&log_dir);
    fs::write(&log_file, "left over from last week").expect("Failed to seed log");

    let cli = Cli {
        dir: Some(fixture.path().to_path_buf()),
        log: true,
        config: Some(settings),
        ..Cli::default()
    };
    run_cli(&cli).expect("Run should succeed");

    let log = fs::read_to_string(&log_file).expect("Log should be written");
    assert!(!log.contains("left over"));
    assert!(log.contains(" Moved file notes.txt to "));
    assert!(!log.contains("Stats =>"));
}

#[test]
fn test_cli_unreadable_directory_fails_and_logs() {
    let fixture = TestFixture::new();
    let (settings, log_file) = settings_with_log(&fixture.temp_dir);
    let missing = fixture.path().join("missing");

    let cli = Cli {
        dir: Some(missing.clone()),
        log: true,
        config: Some(settings),
        ..Cli::default()
    };
    let error = run_cli(&cli).expect_err("Run should fail");

    assert!(error.starts_with(&format!(
        "Error: Failed to read directory {}",
        missing.display()
    )));
    let log = fs::read_to_string(&log_file).expect("Log should be written");
    assert!(log.contains("Error: Failed to read directory"));
    assert!(!log.contains("Organization complete."));
}

#[test]
fn test_cli_skip_rules_from_settings() {
    let fixture = TestFixture::new();
    fixture.create_files(&[("movie.mkv.part", &b"partial"[..]), ("notes.txt", NOTES)]);
    let settings_dir = TempDir::new().expect("Failed to create temp directory");
    let settings = settings_dir.path().join("settings.toml");
    fs::write(&settings, "[skip]\nextensions = [\"part\"]\n").expect("Failed to write settings");

    let cli = Cli {
        dir: Some(fixture.path().to_path_buf()),
        config: Some(settings),
        ..Cli::default()
    };
    run_cli(&cli).expect("Run should succeed");

    fixture.assert_file_exists("movie.mkv.part");
    fixture.assert_file_exists("Documents/notes.txt");
}

#[test]
fn test_cli_demo_prepares_and_organizes_copy() {
    let workspace = TestFixture::new();
    workspace.create_files(&[("fixtures/pic.png", PNG_HEADER), ("fixtures/todo.txt", NOTES)]);
    let settings = workspace.path().join("settings.toml");
    fs::write(
        &settings,
        format!(
            "[options]\ndemo_source = {:?}\n",
            workspace.path().join("fixtures").to_string_lossy().to_string()
        ),
    )
    .expect("Failed to write settings");

    let cli = Cli {
        dir: Some(workspace.path().join("sample")),
        demo: true,
        config: Some(settings),
        ..Cli::default()
    };
    run_cli(&cli).expect("Run should succeed");

    workspace.assert_file_exists("sample/Images/pic.png");
    workspace.assert_file_exists("sample/Documents/todo.txt");
    workspace.assert_file_exists("fixtures/pic.png");
}
