//! Fixed-window request limiter.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::backend::{RateLimitBackend, WindowState};
use super::config::RateLimitConfig;
use super::memory::InMemoryRateLimitBackend;
use crate::analysis::AnalysisError;

/// Type alias for a boxed rate limit backend.
pub type BoxedRateLimitBackend = Arc<dyn RateLimitBackend>;

const UNKNOWN: &str = "unknown";

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
    /// Requests counted in the current window, rejected ones included.
    pub count: u32,
}

/// Per-key fixed-window rate limiter.
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    backend: BoxedRateLimitBackend,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Create a limiter backed by process memory.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_backend(config, Arc::new(InMemoryRateLimitBackend::new()))
    }

    /// Create a limiter with a custom backend.
    pub fn with_backend(config: RateLimitConfig, backend: BoxedRateLimitBackend) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count a request for `key` at the current time.
    pub async fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Utc::now()).await
    }

    /// Count a request for `key` at `now`.
    ///
    /// Expired windows of every key are swept first. Backend failures admit
    /// the request.
    pub async fn check_at(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let limit = self.config.max_requests;
        let window = self.config.chrono_window();

        match self.backend.evict_expired(now).await {
            Ok(0) => {}
            Ok(n) => debug!("Evicted {} expired rate limit entries", n),
            Err(e) => warn!("Rate limit sweep failed: {}", e),
        }

        let state = match self.backend.hit(key, now, window).await {
            Ok(state) => state,
            Err(e) => {
                warn!("Rate limit backend error for {}: {}", key, e);
                return RateLimitDecision {
                    allowed: true,
                    limit,
                    remaining: limit,
                    reset_at: WindowState::new(now, window).reset_at,
                    count: 0,
                };
            }
        };

        let allowed = state.count <= limit;
        if !allowed {
            debug!("Rate limit exceeded for {} ({} > {})", key, state.count, limit);
        }

        RateLimitDecision {
            allowed,
            limit,
            remaining: limit.saturating_sub(state.count),
            reset_at: state.reset_at,
            count: state.count,
        }
    }
}

/// Build the limiter key from a client address and identifier.
///
/// Missing parts are replaced by `unknown`.
pub fn client_key(addr: Option<IpAddr>, client_id: Option<&str>) -> String {
    let addr = addr
        .map(|a| a.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());
    let client_id = client_id.filter(|s| !s.is_empty()).unwrap_or(UNKNOWN);
    format!("{}-{}", addr, client_id)
}

/// Reject a request whose declared size exceeds `max_bytes`.
///
/// A missing declaration counts as zero.
pub fn check_content_length(declared: Option<u64>, max_bytes: u64) -> Result<(), AnalysisError> {
    let size = declared.unwrap_or(0);
    if size > max_bytes {
        return Err(AnalysisError::PayloadTooLarge {
            size,
            limit: max_bytes,
        });
    }
    Ok(())
}
