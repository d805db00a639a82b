//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::middleware::{limit_request_size, rate_limit};
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit =
        usize::try_from(state.settings.rate_limit.max_request_bytes).unwrap_or(usize::MAX);

    let api = Router::new()
        .route("/api/extract", post(handlers::extract))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/analyses", get(handlers::list_analyses))
        .route("/api/analyses/stats", get(handlers::analysis_stats))
        // Size guard runs before the limiter so oversized requests are not counted
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limit_request_size,
        ))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
