//! Cooperative cancellation of a generation pass.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::error::SceneryError;

/// A cloneable flag shared between the caller and a running generation pass.
///
/// The pass polls the token between phases and stops with
/// [`SceneryError::Cancelled`] once it has been triggered.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns [`SceneryError::Cancelled`] if cancellation was requested.
    pub(crate) fn check(&self) -> Result<(), SceneryError> {
        if self.is_cancelled() {
            Err(SceneryError::Cancelled)
        } else {
            Ok(())
        }
    }
}
