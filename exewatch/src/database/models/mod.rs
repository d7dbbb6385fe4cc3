//! Database row models.

use serde::Serialize;
use sqlx::FromRow;

/// A classification outcome as stored in the `predictions` table.
///
/// `detected_at` is an RFC 3339 string; lexicographic order matches
/// chronological order, which the recency index relies on.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PredictionDbModel {
    pub id: i64,
    pub file_name: String,
    pub label: String,
    pub detected_at: String,
}
