//! # Cluster Module
//!
//! Splits a date-ordered run of photos and videos into "events": stretches
//! of files where no two neighbours are more than `max_gap` (15 hours by
//! default) apart.
//!
//! Each cluster is named after its first day. Clusters that last longer than
//! a day are named after their month instead:
//!
//! | span                | name         |
//! |---------------------|--------------|
//! | up to 24 h          | `2024-01-15` |
//! | more than 24 h      | `2024-01`    |

mod clusterer;

pub use clusterer::{ClusterConfig, Clusterer};

use crate::core::scanner::FileDescriptor;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// A group of time-adjacent media files
#[derive(Debug, Clone, Serialize)]
pub struct FileCluster {
    /// Members in ascending date order
    pub files: Vec<FileDescriptor>,
    /// Earliest member date
    pub start: NaiveDateTime,
    /// Latest member date
    pub end: NaiveDateTime,
    /// Directory the members belong in
    pub dir_name: String,
}

impl FileCluster {
    /// Finalize a non-empty run of files; `None` for an empty one
    pub(crate) fn from_files(files: Vec<FileDescriptor>) -> Option<Self> {
        let start = files.iter().map(|f| f.date()).min()?;
        let end = files.iter().map(|f| f.date()).max()?;
        let dir_name = directory_name(start, end);

        Some(Self {
            files,
            start,
            end,
            dir_name,
        })
    }

    /// Time between the first and last member
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// `YYYY-MM` when the span exceeds one day, `YYYY-MM-DD` otherwise.
///
/// The test is on elapsed time, not calendar days: 23:59:59 across midnight
/// is still a day folder, while 25 hours inside one month is a month folder.
pub fn directory_name(start: NaiveDateTime, end: NaiveDateTime) -> String {
    if end - start > Duration::days(1) {
        start.format("%Y-%m").to_string()
    } else {
        start.format("%Y-%m-%d").to_string()
    }
}
