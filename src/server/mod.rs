//! HTTP front for extraction and analysis.
//!
//! Routes:
//! - `GET /health`
//! - `POST /api/extract` (PDF body)
//! - `POST /api/analyze?instructions=...` (PDF body, `X-Provider-Key`)
//! - `GET /api/analyses`, `GET /api/analyses/stats`
//!
//! Every `/api` route passes the request-size guard and the rate limiter.

mod error;
mod handlers;
mod middleware;
mod routes;

pub use error::{ApiError, ErrorBody};
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::{DocumentAnalyzer, InMemoryStore};
use crate::config::Settings;
use crate::llm::AnalysisClient;
use crate::rate_limit::RateLimiter;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: DocumentAnalyzer,
    pub limiter: RateLimiter,
    pub store: Arc<InMemoryStore>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = AnalysisClient::new(settings.llm.clone())?;
        Ok(Self::with_analyzer(
            settings,
            DocumentAnalyzer::new(client, settings.analysis.clone()),
        ))
    }

    /// Build state around an existing analyzer.
    pub fn with_analyzer(settings: &Settings, analyzer: DocumentAnalyzer) -> Self {
        Self {
            analyzer,
            limiter: RateLimiter::new(settings.rate_limit.clone()),
            store: Arc::new(InMemoryStore::new()),
            settings: Arc::new(settings.clone()),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = settings.bind_addr().parse()?;
    tracing::info!("Starting server at http://{}", addr);
    if settings.llm.api_key.is_none() {
        tracing::warn!("No default provider key configured; clients must send X-Provider-Key");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
