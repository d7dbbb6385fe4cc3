//! API request and response models.

use serde::{Deserialize, Serialize};

/// Request body for starting the watcher.
#[derive(Debug, Deserialize)]
pub struct StartMonitorRequest {
    /// Absolute path of the directory to watch.
    pub directory: String,
    /// Inference service base URL; falls back to the configured default.
    pub base_url: Option<String>,
}

/// Generic message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Monitor status response.
#[derive(Debug, Serialize)]
pub struct MonitorStatusResponse {
    pub monitoring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

/// Request body for a one-off manual scan.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Path of the file to classify.
    pub path: String,
    /// Inference service base URL; falls back to the configured default.
    pub base_url: Option<String>,
}

/// Response for a manual scan.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub file_name: String,
    pub prediction: String,
}

/// Query parameters for the prediction history listing.
#[derive(Debug, Deserialize)]
pub struct PredictionsQuery {
    pub limit: Option<i64>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_serialization() {
        let response = MonitorStatusResponse {
            monitoring: true,
            directory: Some("/home/user/Downloads".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"monitoring\":true"));
        assert!(json.contains("Downloads"));

        let idle = MonitorStatusResponse {
            monitoring: false,
            directory: None,
        };
        let json = serde_json::to_string(&idle).unwrap();
        assert!(!json.contains("directory"));
    }

    #[test]
    fn test_start_request_allows_missing_base_url() {
        let request: StartMonitorRequest =
            serde_json::from_str(r#"{"directory": "/downloads"}"#).unwrap();
        assert_eq!(request.directory, "/downloads");
        assert!(request.base_url.is_none());
    }
}
