//! Manual scan route: classify one local file outside a watch session.

use std::path::PathBuf;

use axum::{Json, Router, extract::State, routing::post};
use inference_client::{InferenceClient, InferenceConfig};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{ScanRequest, ScanResponse};
use crate::api::server::AppState;
use crate::error::Error;
use crate::sink::PredictionOutcome;

/// Create the scan router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(scan_file))
}

/// Run one file through the identical two-stage pipeline and record the
/// outcome, without requiring an active watch session.
async fn scan_file(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> ApiResult<Json<ScanResponse>> {
    let path = PathBuf::from(&request.path);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::validation(format!("cannot read `{}`: {}", request.path, e)))?;

    let base_url = request
        .base_url
        .unwrap_or_else(|| state.config.infer_base_url.clone());
    let infer_config = InferenceConfig::new(&base_url)
        .map_err(|e| ApiError::validation(e.to_string()))?
        .with_retry(state.watcher_config.retry.clone())
        .with_request_timeout(state.watcher_config.request_timeout);
    let client = InferenceClient::new(infer_config).map_err(Error::Inference)?;

    let label = client
        .classify(&bytes, &CancellationToken::new())
        .await
        .map_err(Error::Inference)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| request.path.clone());
    let outcome = PredictionOutcome {
        file_name: file_name.clone(),
        label: label.clone(),
        detected_at: chrono::Utc::now(),
    };
    for sink in &state.sinks {
        if let Err(e) = sink.record(&outcome).await {
            warn!(file = %outcome.file_name, error = %e, "Failed to record outcome");
        }
    }

    Ok(Json(ScanResponse {
        file_name,
        prediction: label,
    }))
}
