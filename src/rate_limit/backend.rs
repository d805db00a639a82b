//! Pluggable backend trait for rate limiting storage.
//!
//! The in-memory backend serves a single process; a shared store can be
//! plugged in by implementing [`RateLimitBackend`].

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Result type for rate limit operations.
pub type RateLimitResult<T> = Result<T, RateLimitError>;

/// Errors from rate limit backend operations.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Counter state of one client key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Requests seen in the current window, including the current one.
    pub count: u32,
    /// End of the current window.
    pub reset_at: DateTime<Utc>,
}

impl WindowState {
    /// Open a window at `now`. Windows too long to represent end at
    /// `DateTime::<Utc>::MAX_UTC`.
    pub fn new(now: DateTime<Utc>, window: Duration) -> Self {
        Self {
            count: 1,
            reset_at: now
                .checked_add_signed(window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Whether the window has run out at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.reset_at
    }
}

/// Trait for rate limit storage backends.
///
/// Implementations must be thread-safe and handle concurrent access.
#[async_trait]
pub trait RateLimitBackend: Send + Sync {
    /// Atomically count a request for `key` and return the updated state.
    ///
    /// Starts a fresh window when none exists or the current one expired.
    async fn hit(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> RateLimitResult<WindowState>;

    /// Drop every entry whose window has expired at `now`.
    async fn evict_expired(&self, now: DateTime<Utc>) -> RateLimitResult<usize>;
}
