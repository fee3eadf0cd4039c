//! Batch transcription HTTP endpoint.

pub mod handlers;

use crate::config::ScribeConfig;
use crate::core::batch::BatchTranscriber;
use crate::core::gemini::GeminiTranscriber;
use crate::utils::error::Result;
use crate::utils::validation::validate_socket_addr;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

pub const TRANSCRIBE_ROUTE: &str = "/api/img-to-text";

/// State shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub batch: BatchTranscriber,
}

impl AppState {
    pub fn new(batch: BatchTranscriber) -> Self {
        Self { batch }
    }
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(TRANSCRIBE_ROUTE, post(handlers::img_to_text))
        .route("/api/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Serves `app` on an already bound listener until ctrl-c.
pub async fn start_server(listener: TcpListener, app: Router) -> Result<()> {
    info!("🚀 Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

/// Builds the Gemini-backed endpoint from `config` and runs it.
pub async fn serve(config: &ScribeConfig) -> Result<()> {
    let addr = validate_socket_addr("server.bind", &config.server.bind)?;
    let transcriber = GeminiTranscriber::new(config)?;
    let state = AppState::new(BatchTranscriber::new(transcriber));

    info!(
        "Using model {} at {}",
        config.model.model, config.model.base_url
    );
    let listener = TcpListener::bind(addr).await?;
    start_server(listener, router(state, config.server.max_body_bytes)).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
