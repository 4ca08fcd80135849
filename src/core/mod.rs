//! # Core Module
//!
//! The UI-agnostic clustering engine.
//!
//! ## Modules
//! - `timestamp` - Works out the date of a single file
//! - `scanner` - Walks a directory tree and describes every file
//! - `duplicates` - Finds files that share a name
//! - `cluster` - Groups media files into date clusters
//! - `relocate` - Moves clusters into their own directories
//! - `pipeline` - Orchestrates the full workflow

pub mod cluster;
pub mod duplicates;
pub mod pipeline;
pub mod relocate;
pub mod scanner;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use cluster::FileCluster;
pub use duplicates::DuplicateGroup;
pub use pipeline::{CancellationToken, Pipeline, PipelineOutcome, PipelineResult};
pub use scanner::{FileDescriptor, MediaKind};
pub use timestamp::DateSource;
