//! Append-only text log sink.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::{OutcomeSink, PredictionOutcome};
use crate::Result;

/// Appends one line per outcome: `<timestamp>: <file> -> Prediction: <label>`.
pub struct LogFileSink {
    path: PathBuf,
}

impl LogFileSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl OutcomeSink for LogFileSink {
    async fn record(&self, outcome: &PredictionOutcome) -> Result<()> {
        let line = format!(
            "{}: {} -> Prediction: {}\n",
            outcome.detected_at.to_rfc3339(),
            outcome.file_name,
            outcome.label
        );
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn outcome(file_name: &str, label: &str) -> PredictionOutcome {
        PredictionOutcome {
            file_name: file_name.to_string(),
            label: label.to_string(),
            detected_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn appends_one_line_per_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.log");
        let sink = LogFileSink::new(&path);

        sink.record(&outcome("setup.exe", "benign")).await.unwrap();
        sink.record(&outcome("dropper.exe", "malware"))
            .await
            .unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("setup.exe -> Prediction: benign"));
        assert!(lines[1].contains("dropper.exe -> Prediction: malware"));
    }
}
