//! Rate limiter configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the fixed-window limiter and the request-size guard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in milliseconds.
    pub window_ms: u64,
    /// Requests admitted per key and window.
    pub max_requests: u32,
    /// Largest declared request body accepted.
    pub max_request_bytes: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 15 * 60 * 1000,
            max_requests: 100,
            max_request_bytes: 10 * 1024 * 1024,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub(crate) fn chrono_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.window_ms).unwrap_or(i64::MAX))
    }
}
