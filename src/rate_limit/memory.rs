//! In-memory rate limit backend for single-process operation.
//!
//! State is not persisted across restarts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use super::backend::{RateLimitBackend, RateLimitResult, WindowState};

/// In-memory rate limit backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateLimitBackend {
    entries: Arc<RwLock<HashMap<String, WindowState>>>,
}

impl InMemoryRateLimitBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RateLimitBackend for InMemoryRateLimitBackend {
    async fn hit(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
    ) -> RateLimitResult<WindowState> {
        let mut entries = self.entries.write().await;
        let state = entries
            .entry(key.to_string())
            .and_modify(|state| {
                if state.is_expired(now) {
                    *state = WindowState::new(now, window);
                } else {
                    state.count = state.count.saturating_add(1);
                }
            })
            .or_insert_with(|| WindowState::new(now, window));
        Ok(*state)
    }

    async fn evict_expired(&self, now: DateTime<Utc>) -> RateLimitResult<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, state| !state.is_expired(now));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_hit_counts_within_window() {
        let backend = InMemoryRateLimitBackend::new();
        let window = Duration::minutes(15);

        let first = backend.hit("k", t0(), window).await.unwrap();
        assert_eq!(first.count, 1);
        assert_eq!(first.reset_at, t0() + window);

        let second = backend
            .hit("k", t0() + Duration::minutes(1), window)
            .await
            .unwrap();
        assert_eq!(second.count, 2);
        assert_eq!(second.reset_at, first.reset_at);
    }

    #[tokio::test]
    async fn test_hit_resets_at_boundary() {
        let backend = InMemoryRateLimitBackend::new();
        let window = Duration::minutes(15);
        backend.hit("k", t0(), window).await.unwrap();
        backend.hit("k", t0(), window).await.unwrap();

        let fresh = backend.hit("k", t0() + window, window).await.unwrap();
        assert_eq!(fresh.count, 1);
        assert_eq!(fresh.reset_at, t0() + window + window);
    }

    #[tokio::test]
    async fn test_evict_expired() {
        let backend = InMemoryRateLimitBackend::new();
        backend.hit("old", t0(), Duration::minutes(1)).await.unwrap();
        backend.hit("new", t0(), Duration::minutes(10)).await.unwrap();

        let evicted = backend
            .evict_expired(t0() + Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(evicted, 1);
        assert_eq!(backend.len().await, 1);

        backend
            .evict_expired(t0() + Duration::minutes(10))
            .await
            .unwrap();
        assert!(backend.is_empty().await);
    }
}
