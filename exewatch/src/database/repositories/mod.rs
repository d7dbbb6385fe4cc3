//! Repository implementations.

pub mod prediction;

pub use prediction::{PredictionRepository, SqlxPredictionRepository};
