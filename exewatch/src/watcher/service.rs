//! The watch loop and the per-file processing pipeline.

use std::sync::Arc;
use std::time::Duration;

use inference_client::{InferenceClient, InferenceError, RetryPolicy};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::admission::AdmissionFilter;
use super::events::CandidateFile;
use super::stabilize::StabilizationGate;
use crate::sink::{OutcomeSink, PredictionOutcome};

/// Tunables for a watch session's pipeline.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Settle window before reading a newly-observed file.
    pub settle_delay: Duration,
    /// Size above which a non-fatal warning is emitted.
    pub size_warn_bytes: u64,
    /// Per-request timeout for both remote calls.
    pub request_timeout: Duration,
    /// Retry behavior for both remote calls.
    pub retry: RetryPolicy,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(3),
            size_warn_bytes: 10 * 1024 * 1024,
            request_timeout: Duration::from_secs(90),
            retry: RetryPolicy::default(),
        }
    }
}

/// Admission → stabilization → remote pipeline → sinks, for one session.
///
/// Owns the session's dedup state; one instance per watch session, never
/// shared.
pub struct FilePipeline {
    admission: AdmissionFilter,
    gate: StabilizationGate,
    client: InferenceClient,
    sinks: Vec<Arc<dyn OutcomeSink>>,
    token: CancellationToken,
}

impl FilePipeline {
    pub fn new(
        client: InferenceClient,
        sinks: Vec<Arc<dyn OutcomeSink>>,
        gate: StabilizationGate,
        token: CancellationToken,
    ) -> Self {
        Self {
            admission: AdmissionFilter::new(),
            gate,
            client,
            sinks,
            token,
        }
    }

    /// Process one candidate end to end. Every failure past admission is
    /// contained here: the file is skipped, the session keeps running.
    pub async fn process(&mut self, candidate: CandidateFile) {
        let path = candidate.path;

        if let Err(rejection) = self.admission.admit(&path) {
            debug!(path = %path.display(), reason = %rejection, "Ignoring event");
            return;
        }
        info!(path = %path.display(), "New executable detected");

        let Some(size) = self.gate.settle(&path).await else {
            debug!(path = %path.display(), "File vanished during stabilization; skipping");
            return;
        };

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read file; skipping");
                return;
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match self.client.classify(&bytes, &self.token).await {
            Ok(label) => {
                info!(file = %file_name, size_bytes = size, prediction = %label, "Classification complete");
                let outcome = PredictionOutcome {
                    file_name,
                    label,
                    detected_at: chrono::Utc::now(),
                };
                for sink in &self.sinks {
                    if let Err(e) = sink.record(&outcome).await {
                        warn!(file = %outcome.file_name, error = %e, "Failed to record outcome");
                    }
                }
            }
            Err(InferenceError::Cancelled) => {
                debug!(file = %file_name, "Pipeline cancelled mid-flight");
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "Pipeline failed for file");
            }
        }
    }
}

/// Drain candidates until cancelled.
///
/// Candidates are processed strictly one at a time on this task: a slow
/// remote call for one file delays every queued notification behind it. That
/// serialization is an accepted limitation — new downloads are rare relative
/// to processing latency. Cancellation is cooperative and checked between
/// candidates, so `stop()` waits out at most one in-flight file.
pub async fn run_watch_loop(
    mut events: mpsc::UnboundedReceiver<CandidateFile>,
    mut pipeline: FilePipeline,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => {
                debug!("Watch loop received stop signal");
                break;
            }
            candidate = events.recv() => match candidate {
                Some(candidate) => pipeline.process(candidate).await,
                None => {
                    debug!("Event channel closed; watch loop exiting");
                    break;
                }
            }
        }
    }
    info!("Watch loop shut down");
}
