//! Stabilization gate: wait out in-progress writes before reading.

use std::path::Path;
use std::time::Duration;

use tracing::warn;

/// Default settle window before reading a newly-observed file.
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Files above this size get a non-fatal warning; downstream calls may be
/// slow or time out.
const DEFAULT_SIZE_WARN_BYTES: u64 = 10 * 1024 * 1024;

/// Waits a fixed interval after a notification, then re-verifies the path.
///
/// There is no reliable write-complete signal from the filesystem, so the
/// fixed delay is a heuristic debounce: a download larger than the window
/// allows may still be mid-write when it closes.
#[derive(Debug, Clone)]
pub struct StabilizationGate {
    settle_delay: Duration,
    size_warn_bytes: u64,
}

impl Default for StabilizationGate {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            size_warn_bytes: DEFAULT_SIZE_WARN_BYTES,
        }
    }
}

impl StabilizationGate {
    pub fn new(settle_delay: Duration, size_warn_bytes: u64) -> Self {
        Self {
            settle_delay,
            size_warn_bytes,
        }
    }

    /// Wait out the settle window, then confirm the file still exists.
    ///
    /// Returns the file size, or `None` if the path vanished during the
    /// window (a temp artifact that was renamed away or deleted).
    pub async fn settle(&self, path: &Path) -> Option<u64> {
        tokio::time::sleep(self.settle_delay).await;

        let metadata = tokio::fs::metadata(path).await.ok()?;
        let size = metadata.len();
        if size > self.size_warn_bytes {
            warn!(
                path = %path.display(),
                size_mib = size / (1024 * 1024),
                "Large file; remote calls may be slow"
            );
        }
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_gate() -> StabilizationGate {
        StabilizationGate::new(Duration::from_millis(10), DEFAULT_SIZE_WARN_BYTES)
    }

    #[tokio::test]
    async fn returns_size_for_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.exe");
        tokio::fs::write(&path, vec![0u8; 2048]).await.unwrap();

        assert_eq!(fast_gate().settle(&path).await, Some(2048));
    }

    #[tokio::test]
    async fn returns_none_when_file_vanishes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghost.exe");
        tokio::fs::write(&path, b"MZ").await.unwrap();

        let gate = StabilizationGate::new(Duration::from_millis(100), DEFAULT_SIZE_WARN_BYTES);
        let settle = gate.settle(&path);
        let remove = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tokio::fs::remove_file(&path).await.unwrap();
        };
        let (result, ()) = tokio::join!(settle, remove);
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn oversized_file_still_proceeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.exe");
        tokio::fs::write(&path, vec![0u8; 4096]).await.unwrap();

        // Threshold below the file size: warn but return the size anyway.
        let gate = StabilizationGate::new(Duration::from_millis(10), 1024);
        assert_eq!(gate.settle(&path).await, Some(4096));
    }
}
