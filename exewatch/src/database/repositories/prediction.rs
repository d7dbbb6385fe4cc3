//! Prediction repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::PredictionDbModel;
use crate::sink::PredictionOutcome;

/// Prediction repository trait.
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    async fn insert(&self, outcome: &PredictionOutcome) -> Result<()>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<PredictionDbModel>>;
}

/// SQLx implementation of PredictionRepository.
pub struct SqlxPredictionRepository {
    pool: SqlitePool,
}

impl SqlxPredictionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredictionRepository for SqlxPredictionRepository {
    async fn insert(&self, outcome: &PredictionOutcome) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO predictions (file_name, label, detected_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&outcome.file_name)
        .bind(&outcome.label)
        .bind(outcome.detected_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<PredictionDbModel>> {
        let rows = sqlx::query_as::<_, PredictionDbModel>(
            "SELECT * FROM predictions ORDER BY detected_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
