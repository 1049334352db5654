//! Cooperative cancellation of a running parse.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{DepchartError, Result};

/// Handle for abandoning a parse from another thread.
///
/// Clones share the same flag. The chart passes poll it once per span width,
/// so a cancelled parse returns [`DepchartError::Cancelled`] after at most one
/// more width has been processed.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Clears a previous request so the token can be reused.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Checks if cancellation was requested.
    #[inline(always)]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    #[inline(always)]
    pub(crate) fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(DepchartError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());
        other.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(DepchartError::Cancelled)));
        token.reset();
        assert!(!other.is_cancelled());
    }

    #[test]
    fn test_cancel_from_thread() {
        let token = CancelToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }
}
