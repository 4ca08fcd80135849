//! Directory walking implementation using walkdir.

use super::{FileDescriptor, ScanResult};
use crate::core::pipeline::CancelSignal;
use crate::core::timestamp::TimestampResolver;
use crate::error::ScanError;
use crate::events::{null_sender, EventSender};
use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Minimum time between two "Detected N files" lines
    pub progress_interval: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
            progress_interval: Duration::from_secs(1),
        }
    }
}

/// Recursive, cancellable, files-first directory scanner
pub struct TreeScanner {
    config: ScanConfig,
}

impl TreeScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Check that `root` is an existing directory and make it absolute
    pub fn validate_root(root: &Path) -> Result<PathBuf, ScanError> {
        if !root.exists() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root.to_path_buf(),
            });
        }
        std::path::absolute(root).map_err(|source| ScanError::ReadEntry {
            path: root.to_path_buf(),
            source,
        })
    }

    /// Scan without progress reporting
    pub fn scan(&self, root: &Path, cancel: &dyn CancelSignal) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &null_sender(), cancel)
    }

    /// Scan `root`, polling `cancel` before every file and every directory.
    ///
    /// A cancelled scan still returns `Ok` with whatever was collected and
    /// `cancelled` set.
    pub fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
        cancel: &dyn CancelSignal,
    ) -> Result<ScanResult, ScanError> {
        let root = Self::validate_root(root)?;

        let mut result = ScanResult::default();
        let mut last_report = Instant::now();

        let mut walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by(files_first);

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut entries = walker.into_iter();
        while let Some(entry_result) = entries.next() {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let error = walk_error(e);
                    report_skipped(events, &error);
                    result.errors.push(error);
                    continue;
                }
            };

            if cancel.is_cancelled() {
                debug!(files = result.files.len(), "scan cancelled");
                result.cancelled = true;
                break;
            }

            let hidden = is_hidden(&entry);

            if entry.file_type().is_dir() {
                // walkdir descends on the next call; skipping here prunes the subtree
                if hidden && !self.config.include_hidden {
                    entries.skip_current_dir();
                }
                continue;
            }

            if hidden && !self.config.include_hidden {
                continue;
            }

            match describe(entry.path()) {
                Ok(Some(file)) => result.files.push(file),
                Ok(None) => {}
                Err(error) => {
                    report_skipped(events, &error);
                    result.errors.push(error);
                }
            }

            if last_report.elapsed() >= self.config.progress_interval {
                events.line(format!("Detected {} files", result.files.len()));
                last_report = Instant::now();
            }
        }

        Ok(result)
    }
}

/// Files sort before directories; the sort is stable, so both keep
/// the order the filesystem listed them in.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type().is_dir().cmp(&b.file_type().is_dir())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Build a descriptor for one file. Non-files (e.g. a symlink to a
/// directory when links are not followed) yield `None`.
fn describe(path: &Path) -> Result<Option<FileDescriptor>, ScanError> {
    let metadata = fs::metadata(path).map_err(|source| io_error(path, source))?;
    if !metadata.is_file() {
        return Ok(None);
    }

    let (date, source) = TimestampResolver::resolve(path, &metadata);
    debug!(path = %path.display(), %date, %source, "resolved date");

    Ok(Some(FileDescriptor::new(path.to_path_buf(), date, source)))
}

fn io_error(path: &Path, source: std::io::Error) -> ScanError {
    if source.kind() == ErrorKind::PermissionDenied {
        ScanError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        ScanError::ReadEntry {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn walk_error(e: walkdir::Error) -> ScanError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
    io_error(&path, e.into())
}

fn report_skipped(events: &EventSender, error: &ScanError) {
    warn!("{}", error);
    events.line(format!("Skipped: {}", error));
}
