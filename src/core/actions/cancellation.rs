use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("render cancelled")]
pub struct Cancelled;

/// Polled by render workers before each chunk.
pub trait CancelToken: Send + Sync {
    fn is_cancelled(&self) -> bool;

    fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Cloneable flag for cancelling a render from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes effect at the next chunk boundary of every worker.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}

impl CancelToken for CancelFlag {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl<F> CancelToken for F
where
    F: Fn() -> bool + Send + Sync,
{
    #[inline]
    fn is_cancelled(&self) -> bool {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_cancel_passes_check() {
        assert_eq!(NeverCancel.check(), Ok(()));
    }

    #[test]
    fn test_flag_clones_share_state() {
        let flag = CancelFlag::new();
        let worker_view = flag.clone();

        assert!(!worker_view.is_cancelled());

        flag.cancel();

        assert!(worker_view.is_cancelled());
        assert_eq!(worker_view.check(), Err(Cancelled));
    }

    #[test]
    fn test_closure_token() {
        let limit = 3;
        let token = move || limit > 2;

        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancelled_message() {
        assert_eq!(Cancelled.to_string(), "render cancelled");
    }
}
