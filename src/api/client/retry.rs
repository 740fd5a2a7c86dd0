//! When a failed registry call may be sent again.
//!
//! Reads, lookups and login can be resent after any transient failure.
//! Submissions (create, extend, cancel) are resent only when the registry
//! cannot have acted on the first attempt: the connection never opened, or
//! the request was throttled.

use std::time::Duration;

use crate::error::ApiError;

/// Whether resending a request can change registry state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Replay {
    /// Resending has no effect beyond the first delivery.
    Safe,
    /// Resending may file a second submission.
    Submission,
}

/// Attempt cap and backoff for `CzdsClient` calls.
#[derive(Clone, Copy, Debug)]
pub(super) struct RetryPolicy {
    /// Total sends per call, the first one included.
    pub(super) max_attempts: u32,
    pub(super) initial_backoff: Duration,
    pub(super) max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is zero-based: the send that just failed.
    pub(super) fn should_retry(&self, err: &ApiError, attempt: u32, replay: Replay) -> bool {
        if attempt.saturating_add(1) >= self.max_attempts {
            return false;
        }
        match err {
            ApiError::Http(inner) if inner.is_connect() => true,
            ApiError::Http(inner) => replay == Replay::Safe && inner.is_timeout(),
            ApiError::Status { code: 429, .. } => true,
            ApiError::Status { code, .. } => {
                replay == Replay::Safe && (500..=599).contains(code)
            }
            ApiError::InvalidResponse(_)
            | ApiError::NotAuthenticated
            | ApiError::NoOutstandingRequest(_) => false,
        }
    }

    /// Exponential backoff, overridden by the registry's `Retry-After`.
    pub(super) fn retry_delay_for(&self, attempt: u32, err: &ApiError) -> Duration {
        if let Some(seconds) = err.retry_after_secs() {
            return Duration::from_secs(seconds.clamp(1, 300));
        }
        let scaled = self
            .initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt));
        scaled.min(self.max_backoff)
    }
}
