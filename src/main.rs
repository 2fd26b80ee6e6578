//! URL-Shield Scan Service
//!
//! HTTP service that classifies URLs as phishing or benign.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       URL-SHIELD                           │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────┐   ┌────────────────────┐  │
//! │  │  API      │   │  Feature    │   │  Risk Decision     │  │
//! │  │  (Axum)   │──▶│  Extractor  │──▶│  Engine            │  │
//! │  └───────────┘   └─────────────┘   └─────────┬──────────┘  │
//! │                                              ▼             │
//! │                                    ┌──────────────────┐    │
//! │                                    │  Model Gateway   │    │
//! │                                    │  (ONNX, optional)│    │
//! │                                    └──────────────────┘    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The model artifact is trained by an external pipeline. When it is absent
//! the service starts anyway and serves heuristic verdicts.

mod config;
mod engine;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engine::{ModelError, ModelGateway};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "urlshield=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("URL-Shield scan service starting...");

    // Load the model before accepting traffic; a missing or broken artifact
    // downgrades the service to heuristic mode instead of refusing to start.
    let gateway = Arc::new(ModelGateway::new());
    match gateway.load(&config.model_path) {
        Ok(()) => tracing::info!("model ready, serving calibrated predictions"),
        Err(e @ ModelError::ArtifactMissing(_)) => {
            tracing::warn!("{e}; running in demo mode until a model is trained");
        }
        Err(e) => {
            tracing::error!("model load failed: {e}; running in demo mode");
        }
    }

    let state = AppState {
        gateway,
        config: config.clone(),
    };

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ModelGateway>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::scan::predict))
        .route("/batch-predict", post(handlers::scan::batch_predict))
        // Direct surface (gateway-compatible shapes)
        .route("/api/v1/scan-url", get(handlers::scan::scan_url))
        .route("/api/v1/health", get(handlers::health::check_v1))
        .route("/api/v1/stats", get(handlers::health::stats))
        .fallback(not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Unknown endpoint".to_string())
}
