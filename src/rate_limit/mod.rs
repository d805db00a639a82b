//! Request admission for the HTTP front.
//!
//! Fixed-window counting per client key with a pluggable backend, plus the
//! stateless request-size guard.

mod backend;
mod config;
mod limiter;
mod memory;

pub use backend::{RateLimitBackend, RateLimitError, RateLimitResult, WindowState};
pub use config::RateLimitConfig;
pub use limiter::{
    check_content_length, client_key, BoxedRateLimitBackend, RateLimitDecision, RateLimiter,
};
pub use memory::InMemoryRateLimitBackend;
