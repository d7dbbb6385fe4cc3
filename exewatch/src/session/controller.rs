//! The session controller: at most one active watch session per process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use inference_client::{InferenceClient, InferenceConfig};
use notify::RecommendedWatcher;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::sink::OutcomeSink;
use crate::watcher::{FilePipeline, StabilizationGate, WatcherConfig, events, run_watch_loop};
use crate::{Error, Result};

/// Lifecycle state of the watch session.
///
/// Transitions are monotonic within one session:
/// `Idle -> Active -> Stopping -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Stopping,
}

/// Read-only session snapshot for the status endpoint.
#[derive(Debug, Clone)]
pub struct MonitorStatus {
    pub monitoring: bool,
    pub directory: Option<PathBuf>,
}

/// Everything owned by one running session.
struct ActiveSession {
    directory: PathBuf,
    token: CancellationToken,
    handle: JoinHandle<()>,
    /// Native subscription guard; dropping it ends notifications.
    watcher: RecommendedWatcher,
}

struct Inner {
    state: SessionState,
    session: Option<ActiveSession>,
}

/// Owns the one-and-only watch session and its lifecycle.
///
/// All access goes through `start`/`stop`/`status`; there is no other handle
/// to the running watcher, so the session can only be torn down by the
/// controller that created it.
pub struct SessionController {
    default_base_url: String,
    sinks: Vec<Arc<dyn OutcomeSink>>,
    config: WatcherConfig,
    inner: Mutex<Inner>,
}

impl SessionController {
    pub fn new(
        default_base_url: String,
        sinks: Vec<Arc<dyn OutcomeSink>>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            default_base_url,
            sinks,
            config,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                session: None,
            }),
        }
    }

    /// Start watching `directory`, classifying against `base_url` (or the
    /// configured default). Rejected while a session is already running.
    pub async fn start(&self, directory: PathBuf, base_url: Option<String>) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionState::Idle {
            let current = inner
                .session
                .as_ref()
                .map(|s| s.directory.display().to_string())
                .unwrap_or_default();
            return Err(Error::AlreadyActive { directory: current });
        }

        validate_target_directory(&directory)?;
        if tokio::fs::metadata(&directory).await.is_err() {
            tokio::fs::create_dir_all(&directory).await?;
            info!(directory = %directory.display(), "Created watch directory");
        }

        let base_url = base_url.unwrap_or_else(|| self.default_base_url.clone());
        let infer_config = InferenceConfig::new(&base_url)
            .map_err(|e| Error::validation(e.to_string()))?
            .with_retry(self.config.retry.clone())
            .with_request_timeout(self.config.request_timeout);
        let client = InferenceClient::new(infer_config)?;

        let (watcher, event_rx) = events::subscribe(&directory)?;
        let token = CancellationToken::new();
        let pipeline = FilePipeline::new(
            client,
            self.sinks.clone(),
            StabilizationGate::new(self.config.settle_delay, self.config.size_warn_bytes),
            token.clone(),
        );
        let handle = tokio::spawn(run_watch_loop(event_rx, pipeline, token.clone()));

        info!(
            directory = %directory.display(),
            base_url = %base_url,
            "Watch session started"
        );
        inner.session = Some(ActiveSession {
            directory,
            token,
            handle,
            watcher,
        });
        inner.state = SessionState::Active;
        Ok(())
    }

    /// Stop the running session, waiting for the watch loop to confirm
    /// shutdown. A file currently mid-pipeline is allowed to finish.
    pub async fn stop(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state != SessionState::Active {
            return Err(Error::NotActive);
        }

        inner.state = SessionState::Stopping;
        if let Some(session) = inner.session.take() {
            session.token.cancel();
            // Ends native notifications; anything already queued but not yet
            // processed is dropped, per the no-replay shutdown policy.
            drop(session.watcher);
            if let Err(e) = session.handle.await {
                error!(error = %e, "Watch task terminated abnormally");
            }
            info!(directory = %session.directory.display(), "Watch session stopped");
        }
        inner.state = SessionState::Idle;
        Ok(())
    }

    /// Whether a session is currently active, and on which directory.
    pub async fn status(&self) -> MonitorStatus {
        let inner = self.inner.lock().await;
        MonitorStatus {
            monitoring: inner.state == SessionState::Active,
            directory: inner.session.as_ref().map(|s| s.directory.clone()),
        }
    }
}

/// A watch target must be absolute and must not be a filesystem root.
fn validate_target_directory(path: &Path) -> Result<()> {
    if !path.is_absolute() {
        return Err(Error::validation(format!(
            "target directory must be an absolute path, got `{}`",
            path.display()
        )));
    }
    if path.parent().is_none() {
        return Err(Error::validation(format!(
            "refusing to watch filesystem root `{}`",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_controller() -> SessionController {
        // The base URL is never dialed unless an event is processed.
        SessionController::new(
            "http://127.0.0.1:9".to_string(),
            Vec::new(),
            WatcherConfig::default(),
        )
    }

    #[tokio::test]
    async fn start_twice_is_rejected_and_leaves_one_session() {
        let dir = tempfile::tempdir().unwrap();
        let controller = test_controller();

        controller
            .start(dir.path().to_path_buf(), None)
            .await
            .unwrap();
        let err = controller
            .start(dir.path().to_path_buf(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyActive { .. }));

        let status = controller.status().await;
        assert!(status.monitoring);
        assert_eq!(status.directory.as_deref(), Some(dir.path()));

        controller.stop().await.unwrap();
        assert!(!controller.status().await.monitoring);
    }

    #[tokio::test]
    async fn stop_while_idle_is_rejected_without_panic() {
        let controller = test_controller();
        assert!(matches!(controller.stop().await, Err(Error::NotActive)));
    }

    #[tokio::test]
    async fn session_can_be_restarted_after_stop() {
        let dir = tempfile::tempdir().unwrap();
        let controller = test_controller();

        controller
            .start(dir.path().to_path_buf(), None)
            .await
            .unwrap();
        controller.stop().await.unwrap();
        controller
            .start(dir.path().to_path_buf(), None)
            .await
            .unwrap();
        assert!(controller.status().await.monitoring);
        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn relative_target_is_rejected() {
        let controller = test_controller();
        let err = controller
            .start(PathBuf::from("downloads"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!controller.status().await.monitoring);
    }

    #[tokio::test]
    async fn filesystem_root_is_rejected() {
        let controller = test_controller();
        let err = controller.start(PathBuf::from("/"), None).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_base_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let controller = test_controller();
        let err = controller
            .start(dir.path().to_path_buf(), Some("not a url".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn start_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("downloads");
        let controller = test_controller();

        controller.start(target.clone(), None).await.unwrap();
        assert!(target.is_dir());
        controller.stop().await.unwrap();
    }
}
