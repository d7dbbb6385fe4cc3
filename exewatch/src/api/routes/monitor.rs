//! Monitor lifecycle routes.

use std::path::PathBuf;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::api::error::ApiResult;
use crate::api::models::{MessageResponse, MonitorStatusResponse, StartMonitorRequest};
use crate::api::server::AppState;

/// Create the monitor router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_monitor))
        .route("/stop", post(stop_monitor))
        .route("/status", get(monitor_status))
}

/// Start a watch session on the given directory.
async fn start_monitor(
    State(state): State<AppState>,
    Json(request): Json<StartMonitorRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let directory = PathBuf::from(&request.directory);
    state.controller.start(directory, request.base_url).await?;
    Ok(Json(MessageResponse {
        message: format!("Monitoring started on {}", request.directory),
    }))
}

/// Stop the running watch session.
async fn stop_monitor(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    state.controller.stop().await?;
    Ok(Json(MessageResponse {
        message: "Monitoring stopped".to_string(),
    }))
}

/// Whether a watch session is currently active.
async fn monitor_status(State(state): State<AppState>) -> Json<MonitorStatusResponse> {
    let status = state.controller.status().await;
    Json(MonitorStatusResponse {
        monitoring: status.monitoring,
        directory: status.directory.map(|d| d.display().to_string()),
    })
}
