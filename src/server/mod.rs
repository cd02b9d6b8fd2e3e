
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::query::{AskRequest, AskResponse, QueryEngine};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<QueryEngine>,
}

impl AppState {
    #[inline]
    #[must_use]
    pub fn new(engine: QueryEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Build the question-answering router
#[inline]
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the question-answering API on the configured address
#[inline]
pub async fn serve(config: &Config, engine: QueryEngine) -> Result<()> {
    let addr = config.server.bind_addr();
    let router = build_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind server address {}", addr))?;

    info!("Serving question-answering API on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("Server error")?;

    Ok(())
}

async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    let response = state.engine.ask(&request.question).await.map_err(|e| {
        error!("Failed to answer question: {:#}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e))
    })?;

    Ok(Json(response))
}

async fn health() -> &'static str {
    "OK"
}
