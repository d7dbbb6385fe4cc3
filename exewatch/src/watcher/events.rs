//! Native filesystem notifications bridged into a tokio channel.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::error;

use crate::Result;

/// A path observed by the watcher, before any admission decision.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub detected_at: DateTime<Utc>,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            detected_at: Utc::now(),
        }
    }
}

/// Subscribe to create/modify notifications for a single directory,
/// non-recursively.
///
/// Returns the watcher guard (dropping it ends the subscription) and the
/// receiving end of the candidate channel. The notify callback runs on the
/// watcher's own thread; only create and modify events are forwarded, one
/// candidate per affected path.
pub fn subscribe(
    directory: &Path,
) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<CandidateFile>)> {
    let (tx, rx) = mpsc::unbounded_channel();

    let mut watcher = RecommendedWatcher::new(
        move |result: std::result::Result<Event, notify::Error>| match result {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                for path in event.paths {
                    // send only fails when the watch loop is gone; the
                    // notification is dropped, which is the shutdown policy.
                    let _ = tx.send(CandidateFile::new(path));
                }
            }
            Err(e) => error!(error = %e, "Filesystem watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(directory, RecursiveMode::NonRecursive)?;

    Ok((watcher, rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_event_reaches_the_channel() {
        let dir = tempfile::tempdir().unwrap();
        let (_watcher, mut rx) = subscribe(dir.path()).unwrap();

        tokio::fs::write(dir.path().join("fresh.exe"), b"MZ")
            .await
            .unwrap();

        let candidate = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
            .await
            .expect("notification within timeout")
            .expect("channel open");
        assert_eq!(
            candidate.path.file_name().unwrap().to_str().unwrap(),
            "fresh.exe"
        );
    }

    #[tokio::test]
    async fn subscription_ends_when_guard_drops() {
        let dir = tempfile::tempdir().unwrap();
        let (watcher, mut rx) = subscribe(dir.path()).unwrap();
        drop(watcher);

        // With the guard gone the sender side is dropped too, so the channel
        // eventually closes rather than hanging forever.
        let closed = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            loop {
                if rx.recv().await.is_none() {
                    break;
                }
            }
        })
        .await;
        assert!(closed.is_ok());
    }
}
