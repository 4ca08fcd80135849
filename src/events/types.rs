//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marker line emitted when a run finishes normally
pub const FINISH_MARKER: &str = "################ Finish ################";
/// Marker line emitted when a run is cancelled during the scan
pub const CANCEL_MARKER: &str = "################ Cancel ################";
/// Marker line emitted when a run cannot start, followed by the reason
pub const INVALID_MARKER: &str = "################ Invalid ################";

/// All events emitted by the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A human-readable log line
    Line(LogLine),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// One advisory log line, optionally tagged with the file it talks about.
///
/// A UI can open `path` when the user activates the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub text: String,
    pub path: Option<PathBuf>,
}

impl LogLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
        }
    }

    pub fn with_path(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            path: Some(path.into()),
        }
    }
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started { root: PathBuf },
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline was cancelled while scanning
    Cancelled { files_scanned: usize },
    /// Pipeline could not start
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    DuplicateAnalysis,
    Classifying,
    Clustering,
    Relocating,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Total files scanned
    pub total_files: usize,
    /// Number of duplicate file name groups
    pub duplicate_groups: usize,
    /// Files with a recognised image or movie extension
    pub media_files: usize,
    /// Everything else
    pub non_media_files: usize,
    /// Number of date clusters
    pub clusters: usize,
    /// Files moved into cluster directories
    pub files_moved: usize,
    /// Files that could not be moved
    pub move_failures: usize,
    /// Entries skipped during the scan
    pub scan_errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::DuplicateAnalysis => write!(f, "Looking for duplicates"),
            PipelinePhase::Classifying => write!(f, "Classifying"),
            PipelinePhase::Clustering => write!(f, "Clustering"),
            PipelinePhase::Relocating => write!(f, "Moving files"),
        }
    }
}
