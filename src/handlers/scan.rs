//! URL scan handlers
//!
//! Thin plumbing around the engine: request validation, response shaping and
//! the batch/direct-surface conventions. No decision logic lives here.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::engine::rules::{MSG_BENIGN, MSG_HIGH_RISK};
use crate::engine::{self, Label, UrlFeatures};
use crate::{AppResult, AppState};

/// Upper bound on URLs processed per batch request.
pub const MAX_BATCH_URLS: usize = 100;

// ============================================================================
// REQUEST / RESPONSE SHAPES
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct ScanRequest {
    #[validate(custom(function = validate_scheme))]
    pub url: String,
}

fn validate_scheme(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        let mut err = ValidationError::new("scheme");
        err.message = Some("URL must start with http:// or https://".into());
        Err(err)
    }
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub url: String,
    pub prediction: Label,
    pub confidence: f64,
    pub risk_score: f64,
    pub features: UrlFeatures,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<BatchItem>,
    pub total: usize,
}

/// Per-item outcome; a failed URL carries an inline error instead of
/// aborting the batch.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Scanned(Box<ScanResponse>),
    Failed { url: String, error: String },
}

// ============================================================================
// SCAN ENDPOINTS
// ============================================================================

/// Classify one URL.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    request.validate()?;

    tracing::info!("analyzing URL: {}", request.url);
    Ok(Json(scan_one(&state, request.url)))
}

/// Classify up to [`MAX_BATCH_URLS`] URLs in one request.
pub async fn batch_predict(
    State(state): State<AppState>,
    Json(urls): Json<Vec<String>>,
) -> Json<BatchResponse> {
    let mut results = Vec::new();
    for url in urls.into_iter().take(MAX_BATCH_URLS) {
        let request = ScanRequest { url };
        match request.validate() {
            Ok(()) => results.push(BatchItem::Scanned(Box::new(scan_one(&state, request.url)))),
            Err(e) => results.push(BatchItem::Failed {
                url: request.url,
                error: e.to_string(),
            }),
        }
    }

    Json(BatchResponse {
        total: results.len(),
        results,
    })
}

fn scan_one(state: &AppState, url: String) -> ScanResponse {
    let features = engine::extract(&url);
    let verdict = engine::decide(&features, &state.gateway);

    tracing::info!(
        "prediction: {}, confidence: {:.2}, risk score: {:.2}",
        verdict.label,
        verdict.confidence,
        verdict.risk_score
    );

    ScanResponse {
        url,
        prediction: verdict.label,
        confidence: round(verdict.confidence, 4),
        risk_score: round(verdict.risk_score, 2),
        features,
        message: verdict.message.to_string(),
    }
}

// ============================================================================
// DIRECT SCAN SURFACE
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectScanResponse {
    pub url: String,
    pub prediction: Label,
    pub confidence: f64,
    pub message: &'static str,
    pub response_time_ms: u64,
    pub from_cache: bool,
    pub timestamp: String,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectScanError {
    pub error: String,
    pub url: String,
    pub timestamp: String,
    pub request_id: String,
}

/// Direct scan: URL as a query parameter, camelCase payload with timing and
/// a correlation id. Validation failures come back inline, not as HTTP
/// errors.
pub async fn scan_url(State(state): State<AppState>, Query(query): Query<ScanQuery>) -> Response {
    let started = Instant::now();
    let request_id = short_request_id();

    if !query.url.starts_with("http://") && !query.url.starts_with("https://") {
        return Json(DirectScanError {
            error: "URL must start with http:// or https://".to_string(),
            url: query.url,
            timestamp: chrono::Utc::now().to_rfc3339(),
            request_id,
        })
        .into_response();
    }

    tracing::info!("direct scan: {}", query.url);
    let features = engine::extract(&query.url);
    let verdict = engine::quick_decide(&query.url, &features, &state.gateway);

    let message = match verdict.label {
        Label::Phishing => MSG_HIGH_RISK,
        Label::Benign => MSG_BENIGN,
    };

    Json(DirectScanResponse {
        url: query.url,
        prediction: verdict.label,
        confidence: round(verdict.confidence, 4),
        message,
        response_time_ms: started.elapsed().as_millis() as u64,
        from_cache: false,
        timestamp: chrono::Utc::now().to_rfc3339(),
        request_id,
    })
    .into_response()
}

fn short_request_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}

fn round(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::rules::MSG_DEMO_MODE;
    use crate::engine::ModelGateway;
    use std::sync::Arc;

    fn test_state() -> AppState {
        AppState {
            gateway: Arc::new(ModelGateway::new()),
            config: Config {
                port: 0,
                model_path: "missing.onnx".into(),
                environment: "test".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn batch_is_capped_at_one_hundred() {
        let urls: Vec<String> = (0..101)
            .map(|i| format!("https://site-{i}.example.com/"))
            .collect();

        let Json(body) = batch_predict(State(test_state()), Json(urls)).await;
        assert_eq!(body.total, MAX_BATCH_URLS);
        assert_eq!(body.results.len(), MAX_BATCH_URLS);
    }

    #[tokio::test]
    async fn batch_inlines_per_item_failures() {
        let urls = vec![
            "https://ok.example.com/".to_string(),
            "ftp://bad.example.com/".to_string(),
        ];

        let Json(body) = batch_predict(State(test_state()), Json(urls)).await;
        assert_eq!(body.total, 2);
        assert!(matches!(body.results[0], BatchItem::Scanned(_)));
        assert!(matches!(body.results[1], BatchItem::Failed { .. }));
    }

    #[tokio::test]
    async fn predict_rejects_missing_scheme() {
        let request = ScanRequest {
            url: "example.com".to_string(),
        };
        assert!(predict(State(test_state()), Json(request)).await.is_err());
    }

    #[tokio::test]
    async fn predict_serves_heuristic_verdict_without_model() {
        let request = ScanRequest {
            url: "http://192.168.1.1/paypal-login-verify.tk".to_string(),
        };

        let Json(body) = predict(State(test_state()), Json(request)).await.unwrap();
        assert_eq!(body.prediction, Label::Phishing);
        assert_eq!(body.risk_score, 50.0);
        assert_eq!(body.message, MSG_DEMO_MODE);
    }

    #[test]
    fn rounding_matches_response_contract() {
        assert_eq!(round(0.123456, 4), 0.1235);
        assert_eq!(round(66.66666, 2), 66.67);
    }
}
