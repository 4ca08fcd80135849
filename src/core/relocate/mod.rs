//! Moves clustered files into their date directories.
//!
//! Every move is independent: a failure is recorded, reported and the
//! next file is tried. Existing destination files are never overwritten.

mod executor;

pub use executor::{move_file, MoveOutcome, Relocator};

use crate::error::RelocateError;
use serde::Serialize;
use std::path::PathBuf;

/// A file that reached its cluster directory
#[derive(Debug, Clone, Serialize)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// A file that could not be moved
#[derive(Debug, Clone, Serialize)]
pub struct RelocationFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl RelocationFailure {
    pub(crate) fn new(path: PathBuf, error: &RelocateError) -> Self {
        Self {
            path,
            reason: error.to_string(),
        }
    }
}

/// What happened to one cluster
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterRelocation {
    /// The cluster directory
    pub directory: PathBuf,
    /// Whether the directory had to be created for this cluster
    pub created_directory: bool,
    pub moved: Vec<MovedFile>,
    /// Files that were already where they belong
    pub already_in_place: Vec<PathBuf>,
    pub failures: Vec<RelocationFailure>,
}

/// Totals across every cluster of a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelocationReport {
    pub clusters: Vec<ClusterRelocation>,
    /// Members of clusters whose directory could not be created
    pub unplaced: Vec<RelocationFailure>,
}

impl RelocationReport {
    pub fn files_moved(&self) -> usize {
        self.clusters.iter().map(|c| c.moved.len()).sum()
    }

    pub fn directories_created(&self) -> usize {
        self.clusters.iter().filter(|c| c.created_directory).count()
    }

    pub fn failure_count(&self) -> usize {
        self.clusters.iter().map(|c| c.failures.len()).sum::<usize>() + self.unplaced.len()
    }
}
