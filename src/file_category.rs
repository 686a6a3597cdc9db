//! File classification for choosing destination folders.
//!
//! Files are classified either by sniffing their leading bytes into a coarse
//! content kind ("Images", "Documents", ...) or, in exact mode, by their
//! extension ("PNG", "TXT", "NoExt"). The resulting [`Category`] doubles as
//! the name of the subfolder the file is moved into.
//!
//! # Examples
//!
//! ```
//! use typesort::file_category::{Category, ClassifyMode, FileKind, classify};
//!
//! let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
//! assert_eq!(
//!     classify(ClassifyMode::Content, "photo.jpg", &jpeg),
//!     Category::Kind(FileKind::Images)
//! );
//! assert_eq!(classify(ClassifyMode::Exact, "photo.jpg", &jpeg).dir_name(), "JPG");
//! ```
use infer::MatcherType;
use std::fmt;

/// Bytes handed to the sniffer; magic numbers never sit deeper than this.
pub const SNIFF_LIMIT: usize = 8192;

/// Folder name used in exact mode for files without an extension.
pub const NO_EXTENSION: &str = "NoExt";

/// How files are classified during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifyMode {
    /// Sniff magic bytes into one of the fixed content kinds.
    #[default]
    Content,
    /// Use the upper-cased file extension verbatim.
    Exact,
}

/// Coarse content kinds produced by sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Images,
    Videos,
    Audio,
    Archives,
    Documents,
    Other,
}

impl FileKind {
    /// Every kind, in display order.
    pub const ALL: [FileKind; 6] = [
        FileKind::Images,
        FileKind::Videos,
        FileKind::Audio,
        FileKind::Archives,
        FileKind::Documents,
        FileKind::Other,
    ];

    /// Returns the folder name for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use typesort::file_category::FileKind;
    ///
    /// assert_eq!(FileKind::Images.dir_name(), "Images");
    /// assert_eq!(FileKind::Other.dir_name(), "Other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            FileKind::Images => "Images",
            FileKind::Videos => "Videos",
            FileKind::Audio => "Audio",
            FileKind::Archives => "Archives",
            FileKind::Documents => "Documents",
            FileKind::Other => "Other",
        }
    }

    /// Looks a kind up by its exact folder name.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.dir_name() == name)
    }
}

/// The destination of a file, which is also the name of its subfolder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// A sniffed content kind.
    Kind(FileKind),
    /// An upper-cased extension, e.g. `PNG`.
    Extension(String),
    /// A file without an extension in exact mode.
    NoExtension,
}

impl Category {
    /// Returns the subfolder name for this category.
    pub fn dir_name(&self) -> &str {
        match self {
            Category::Kind(kind) => kind.dir_name(),
            Category::Extension(ext) => ext,
            Category::NoExtension => NO_EXTENSION,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Classifies a file by name or content, depending on `mode`.
///
/// In content mode `contents` must be non-empty; empty files are filtered out
/// before classification. Only the first [`SNIFF_LIMIT`] bytes are inspected.
pub fn classify(mode: ClassifyMode, file_name: &str, contents: &[u8]) -> Category {
    match mode {
        ClassifyMode::Content => Category::Kind(sniff_kind(contents)),
        ClassifyMode::Exact => extension_category(file_name),
    }
}

/// Maps the magic bytes at the start of `contents` to a content kind.
///
/// Anything the sniffer does not recognise falls back to `Documents` when the
/// prefix reads as text, and to `Other` otherwise.
pub fn sniff_kind(contents: &[u8]) -> FileKind {
    let prefix = &contents[..contents.len().min(SNIFF_LIMIT)];

    match infer::get(prefix).map(|kind| kind.matcher_type()) {
        Some(MatcherType::Image) => FileKind::Images,
        Some(MatcherType::Video) => FileKind::Videos,
        Some(MatcherType::Audio) => FileKind::Audio,
        Some(MatcherType::Archive) => FileKind::Archives,
        Some(MatcherType::Doc | MatcherType::Book | MatcherType::Text) => FileKind::Documents,
        Some(_) => FileKind::Other,
        None if looks_like_text(prefix) => FileKind::Documents,
        None => FileKind::Other,
    }
}

/// True when `prefix` is UTF-8 (allowing a code point cut off at the end)
/// and contains no NUL bytes.
fn looks_like_text(prefix: &[u8]) -> bool {
    if prefix.is_empty() || prefix.contains(&0) {
        return false;
    }
    match std::str::from_utf8(prefix) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}

/// Maps a file name to its exact-mode category.
///
/// # Examples
///
/// ```
/// use typesort::file_category::{Category, extension_category};
///
/// assert_eq!(extension_category("photo.png"), Category::Extension("PNG".into()));
/// assert_eq!(extension_category("archive.tar.GZ"), Category::Extension("GZ".into()));
/// assert_eq!(extension_category("Makefile"), Category::NoExtension);
/// ```
pub fn extension_category(file_name: &str) -> Category {
    match file_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Category::Extension(ext.to_lowercase().to_uppercase()),
        _ => Category::NoExtension,
    }
}

/// Returns true if `name` is one of the fixed content-kind folders.
pub fn is_category_folder(name: &str) -> bool {
    FileKind::from_dir_name(name).is_some()
}

/// Returns true if `name` looks like a folder created in exact mode.
///
/// That is `NoExt`, or a non-empty name without dots or spaces that is
/// already upper case and is not one of the content-kind folders. Digit-only
/// names such as `7Z` qualify.
pub fn is_exact_folder(name: &str) -> bool {
    if name == NO_EXTENSION {
        return true;
    }
    if name.is_empty() || is_category_folder(name) {
        return false;
    }
    if name.contains('.') || name.contains(' ') {
        return false;
    }
    name == name.to_uppercase()
}

/// Returns true if a directory named `name` holds output of `mode` and must
/// not be descended into.
pub fn is_output_folder(mode: ClassifyMode, name: &str) -> bool {
    match mode {
        ClassifyMode::Content => is_category_folder(name),
        ClassifyMode::Exact => is_exact_folder(name),
    }
}
