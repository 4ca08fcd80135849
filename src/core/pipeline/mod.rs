//! # Pipeline Module
//!
//! Orchestrates the full workflow.
//!
//! ## Pipeline Stages
//! 1. **Scan** - Walk the tree and resolve a date for every file (cancellable)
//! 2. **Duplicates** - Report files that share a name
//! 3. **Classify** - Split media from everything else
//! 4. **Cluster** - Group media into date clusters
//! 5. **Relocate** - Optionally move each cluster into its own directory
//!
//! ## Threading
//! The stages run strictly one after another on a single worker thread
//! (see [`Pipeline::spawn`]). The only state shared with the control thread
//! is the [`CancellationToken`].

mod cancel;
mod executor;

pub use cancel::{CancelSignal, CancellationToken};
pub use executor::{
    Pipeline, PipelineBuilder, PipelineConfig, PipelineHandle, PipelineOutcome, PipelineResult,
};
