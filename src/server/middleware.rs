//! Request guards applied to every `/api` route.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::SecondsFormat;

use super::error::ApiError;
use super::AppState;
use crate::rate_limit::{check_content_length, client_key, RateLimitDecision};

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Reject requests whose declared `Content-Length` exceeds the ceiling.
pub async fn limit_request_size(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    if let Err(e) = check_content_length(declared, state.settings.rate_limit.max_request_bytes) {
        return ApiError::from(e).into_response();
    }

    next.run(request).await
}

/// Count the request against its client key and attach limit headers.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    let key = client_key(addr, user_agent);
    let decision = state.limiter.check(&key).await;

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!("Rate limit exceeded for {}", key);
        ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests from this client, please try again later.",
        )
        .into_response()
    };

    insert_limit_headers(response.headers_mut(), &decision);
    response
}

fn insert_limit_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(HEADER_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(HEADER_REMAINING, HeaderValue::from(decision.remaining));
    let reset = decision
        .reset_at
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Ok(value) = HeaderValue::from_str(&reset) {
        headers.insert(HEADER_RESET, value);
    }
}
