//! Client for the remote executable-analysis service.
//!
//! The service exposes two endpoints that are always called in sequence:
//! `POST /extract_features` maps raw PE bytes to named numeric features, and
//! `POST /predict` maps an ordered feature vector to a prediction label.
//! [`InferenceClient::classify`] drives the full sequence; both wire calls go
//! through a shared retry-with-backoff wrapper for transient upstream
//! failures.

pub mod client;
pub mod config;
pub mod error;
pub mod features;
pub mod retry;

pub use client::InferenceClient;
pub use config::InferenceConfig;
pub use error::InferenceError;
pub use features::{FEATURE_COUNT, FEATURE_ORDER, FeatureVector};
pub use retry::{RetryAction, RetryPolicy, retry_with_backoff};
