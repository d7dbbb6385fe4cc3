//! Outcome sinks.
//!
//! Successful classifications fan out to every configured sink: the
//! append-only predictions log and the database. A sink failure is logged by
//! the caller and never aborts the watch session.

pub mod db;
pub mod log;

pub use db::DbSink;
pub use log::LogFileSink;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Result;

/// The outcome of one fully-classified file. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub file_name: String,
    pub label: String,
    pub detected_at: DateTime<Utc>,
}

/// Destination for classification outcomes.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn record(&self, outcome: &PredictionOutcome) -> Result<()>;
}
