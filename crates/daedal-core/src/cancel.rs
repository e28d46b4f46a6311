//! Cooperative cancellation for in-flight animated sequences.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cancellation token backed by an [`AtomicBool`].
///
/// Clones share the same flag. A controller driving a step sequence checks
/// the token between steps and aborts cleanly once it is tripped.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, untripped token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}
