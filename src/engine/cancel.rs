//! Cooperative cancellation.

use crate::error::ScoreError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag with an optional deadline.
///
/// Clones share the flag; cancelling any clone cancels them all. The engine
/// polls it between documents, between features and while walking
/// directories.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that is only cancelled explicitly
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that also expires after `timeout`
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested or the deadline passed
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Time left before the deadline, if one is set
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// `Err(Cancelled)` once cancelled
    pub fn check(&self) -> Result<(), ScoreError> {
        if self.is_cancelled() {
            Err(ScoreError::Cancelled)
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
        let clone = token.clone();
        assert!(token.check().is_ok());
        clone.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(ScoreError::Cancelled)));
    }

    #[test]
    fn test_deadline() {
        let expired = CancelToken::with_timeout(Duration::ZERO);
        assert!(expired.is_cancelled());
        let long = CancelToken::with_timeout(Duration::from_secs(3600));
        assert!(!long.is_cancelled());
        assert!(long.remaining().is_some_and(|r| r > Duration::from_secs(3000)));
    }
}
