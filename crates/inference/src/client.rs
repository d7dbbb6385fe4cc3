//! The two-stage pipeline client.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::InferenceConfig;
use crate::error::InferenceError;
use crate::features::FeatureVector;
use crate::retry::{RetryAction, RetryPolicy, is_retryable_reqwest_error, retry_with_backoff};

/// Client for the remote extraction + prediction service.
///
/// Cheap to clone; the underlying reqwest client is reference-counted.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self, InferenceError> {
        let http = config.build_http_client()?;
        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
            retry: config.retry,
        })
    }

    /// Send raw file bytes to `/extract_features` and return the named
    /// feature mapping.
    pub async fn extract_features(
        &self,
        file_bytes: &[u8],
        token: &CancellationToken,
    ) -> Result<Map<String, Value>, InferenceError> {
        let file_base64 = BASE64.encode(file_bytes);
        debug!(
            payload_chars = file_base64.len(),
            "Sending file for feature extraction"
        );

        let response = self
            .post_json(
                "extract_features",
                json!({ "file_base64": file_base64 }),
                token,
            )
            .await?;

        match response {
            Value::Object(map) => Ok(map),
            other => Err(InferenceError::malformed(
                "extract_features",
                format!("expected a feature object, got {other}"),
            )),
        }
    }

    /// Send an ordered feature vector to `/predict` and return the label.
    pub async fn predict(
        &self,
        features: &FeatureVector,
        token: &CancellationToken,
    ) -> Result<String, InferenceError> {
        let response = self
            .post_json("predict", json!({ "features": features }), token)
            .await?;

        response
            .get("prediction")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| InferenceError::malformed("predict", "missing `prediction` field"))
    }

    /// Run the full pipeline for one file: extract, project into the fixed
    /// field order, predict.
    pub async fn classify(
        &self,
        file_bytes: &[u8],
        token: &CancellationToken,
    ) -> Result<String, InferenceError> {
        let named = self.extract_features(file_bytes, token).await?;
        let vector = FeatureVector::from_named(&named);
        debug!(features = ?vector.values(), "Ordered feature vector");
        self.predict(&vector, token).await
    }

    /// POST a JSON body to `{base}/{operation}` with retry-and-backoff,
    /// returning the parsed JSON response.
    async fn post_json(
        &self,
        operation: &'static str,
        body: Value,
        token: &CancellationToken,
    ) -> Result<Value, InferenceError> {
        let url = format!("{}/{operation}", self.base_url);

        retry_with_backoff(&self.retry, token, |_| {
            let url = url.clone();
            let body = body.clone();
            async move {
                let result = self.http.post(&url).json(&body).send().await;
                match result {
                    Ok(response) => {
                        let status = response.status();
                        if status.is_success() {
                            match response.json::<Value>().await {
                                Ok(value) => RetryAction::Success(value),
                                Err(e) => RetryAction::Fail(InferenceError::malformed(
                                    operation,
                                    e.to_string(),
                                )),
                            }
                        } else {
                            let err = InferenceError::HttpStatus {
                                status,
                                operation,
                                body: response.text().await.unwrap_or_default(),
                            };
                            if self.retry.is_retryable_status(status) {
                                RetryAction::Retry(err)
                            } else {
                                RetryAction::Fail(err)
                            }
                        }
                    }
                    Err(e) if is_retryable_reqwest_error(&e) => RetryAction::Retry(e.into()),
                    Err(e) => RetryAction::Fail(e.into()),
                }
            }
        })
        .await
    }
}
