//! Application configuration.

use std::path::PathBuf;

/// Service-level configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// Default inference service base URL, used when a start/scan request
    /// does not carry its own.
    pub infer_base_url: String,
    /// Path of the append-only predictions log.
    pub predictions_log: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:exewatch.db?mode=rwc".to_string(),
            infer_base_url: "http://127.0.0.1:8000".to_string(),
            predictions_log: PathBuf::from("predictions.log"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    ///
    /// Supported env vars:
    /// - `DATABASE_URL` (e.g. "sqlite:exewatch.db?mode=rwc")
    /// - `INFER_BASE_URL` (e.g. "http://inference.internal:8000")
    /// - `PREDICTIONS_LOG` (e.g. "/var/log/exewatch/predictions.log")
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(database_url) = std::env::var("DATABASE_URL")
            && !database_url.trim().is_empty()
        {
            config.database_url = database_url;
        }

        if let Ok(base_url) = std::env::var("INFER_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.infer_base_url = base_url;
        }

        if let Ok(log_path) = std::env::var("PREDICTIONS_LOG")
            && !log_path.trim().is_empty()
        {
            config.predictions_log = PathBuf::from(log_path);
        }

        config
    }
}
