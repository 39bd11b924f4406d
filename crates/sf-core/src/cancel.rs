//! Cooperative cancellation token propagated from the Transport's request
//! context down through the Orchestrator and Tuner. No hand-written
//! event-loop is assumed; this is just a shared flag plus a way to wait on
//! it going high.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }

    /// Short-circuit helper for loops: bail out of the current operation
    /// before any store-commit has happened.
    pub fn check(&self) -> Result<(), crate::error::EngineError> {
        if self.is_cancelled() {
            Err(crate::error::EngineError::inconsistent(
                "operation cancelled before commit",
            ))
        } else {
            Ok(())
        }
    }
}
