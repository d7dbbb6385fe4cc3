//! Prediction history routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::api::error::ApiResult;
use crate::api::models::PredictionsQuery;
use crate::api::server::AppState;
use crate::database::models::PredictionDbModel;

/// Create the predictions router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_predictions))
}

/// Recent classification outcomes, newest first.
async fn list_predictions(
    State(state): State<AppState>,
    Query(query): Query<PredictionsQuery>,
) -> ApiResult<Json<Vec<PredictionDbModel>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let rows = state.predictions.list_recent(limit).await?;
    Ok(Json(rows))
}
