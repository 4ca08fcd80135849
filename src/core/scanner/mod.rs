//! # Scanner Module
//!
//! Walks a directory tree and describes every file it finds.
//!
//! Each file gets a [`FileDescriptor`] carrying its resolved date (see
//! [`crate::core::timestamp`]). The walk is files-first: every directory
//! reports its own files before descending into its subdirectories.
//!
//! ## Example
//! ```rust,ignore
//! use photo_cluster::core::scanner::{ScanConfig, TreeScanner};
//! use photo_cluster::core::pipeline::CancellationToken;
//!
//! let scanner = TreeScanner::new(ScanConfig::default());
//! let result = scanner.scan("/Users/photos".as_ref(), &CancellationToken::new())?;
//! ```

mod filter;
mod walker;

pub use filter::MediaKind;
pub use walker::{ScanConfig, TreeScanner};

use crate::core::timestamp::{lowercase_extension, DateSource};
use crate::error::ScanError;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything the pipeline needs to know about one file.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    path: PathBuf,
    file_name: String,
    file_name_lower: String,
    extension: String,
    date: NaiveDateTime,
    date_source: DateSource,
}

impl FileDescriptor {
    /// Describe `path` with an already resolved date
    pub fn new(path: PathBuf, date: NaiveDateTime, date_source: DateSource) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name_lower = file_name.to_lowercase();
        let extension = lowercase_extension(&path);

        Self {
            path,
            file_name,
            file_name_lower,
            extension,
            date,
            date_source,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Key used for case-insensitive duplicate detection
    pub fn file_name_lower(&self) -> &str {
        &self.file_name_lower
    }

    /// Lowercased, with the leading dot (`.jpg`); empty without an extension
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn date_source(&self) -> DateSource {
        self.date_source
    }

    /// Image or movie, if the extension is a recognised media type
    pub fn media_kind(&self) -> Option<MediaKind> {
        MediaKind::from_extension(&self.extension)
    }

    pub fn is_media(&self) -> bool {
        self.media_kind().is_some()
    }
}

/// Result of a scan operation
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Files described so far, in walk order
    pub files: Vec<FileDescriptor>,
    /// Entries that were skipped (non-fatal)
    pub errors: Vec<ScanError>,
    /// Whether the walk stopped early because cancellation was requested
    pub cancelled: bool,
}
