//! Cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Polled by the worker at every checkpoint
pub trait CancelSignal: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

/// A cloneable cancel flag shared between the control thread and the worker.
///
/// The flag only ever goes from "running" to "cancelled" within a run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; takes effect at the worker's next checkpoint
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
