//! Health and status handlers

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::json;

use crate::engine::LayoutInfo;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_loaded: bool,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        model_loaded: state.gateway.is_loaded(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

/// Root service descriptor
pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "service": "URL-Shield Phishing Scan Service",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "online",
        "endpoints": {
            "predict": "/predict",
            "batch_predict": "/batch-predict",
            "scan_url": "/api/v1/scan-url",
            "health": "/health",
            "stats": "/api/v1/stats"
        }
    }))
}

/// Actuator-style component health for gateway compatibility
pub async fn check_v1(State(state): State<AppState>) -> Json<serde_json::Value> {
    let loaded = state.gateway.is_loaded();
    Json(json!({
        "status": "UP",
        "components": {
            "ml_model": {
                "status": if loaded { "UP" } else { "DOWN" },
                "details": {
                    "loaded": loaded,
                    "type": if loaded { "onnx" } else { "demo_mode" }
                }
            },
            "ping": { "status": "UP" }
        }
    }))
}

/// Operational stats: model state plus the feature schema the service was
/// built against.
pub async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    let model = match state.gateway.metadata() {
        Some(meta) => json!({
            "status": "loaded",
            "path": meta.model_path,
            "loaded_at": meta.loaded_at,
        }),
        None => json!({ "status": "demo_mode" }),
    };

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "model": model,
        "feature_schema": LayoutInfo::current(),
    }))
}

// ============================================================================
// TESTS
// ============================================================================
