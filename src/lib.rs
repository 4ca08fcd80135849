//! # Photo Cluster
//!
//! Sorts a folder full of photos and videos into date-based folders.
//!
//! ## Core Philosophy
//! - **Preview first** - a dry run reports exactly what would move
//! - **Never overwrite** - an existing destination file is reported, not replaced
//! - **Always finish the walk** - a single unreadable file never aborts a scan
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Timestamp resolution, scanning, duplicates, clustering, relocation
//! - `events` - Event-driven progress reporting (GUI-ready)
//! - `error` - User-friendly error types
//! - `cli` - Command-line interface

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{PhotoClusterError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
/// Diagnostics go to stderr so that JSON output on stdout stays parseable.
/// Calling it twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
