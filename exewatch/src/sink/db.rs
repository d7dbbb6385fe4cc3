//! Database sink.

use std::sync::Arc;

use async_trait::async_trait;

use super::{OutcomeSink, PredictionOutcome};
use crate::Result;
use crate::database::repositories::PredictionRepository;

/// Persists outcomes as rows in the `predictions` table.
pub struct DbSink {
    repository: Arc<dyn PredictionRepository>,
}

impl DbSink {
    pub fn new(repository: Arc<dyn PredictionRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl OutcomeSink for DbSink {
    async fn record(&self, outcome: &PredictionOutcome) -> Result<()> {
        self.repository.insert(outcome).await
    }
}
