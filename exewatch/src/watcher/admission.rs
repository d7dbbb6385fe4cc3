//! Admission rules: which observed paths enter the pipeline.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffixes browsers use for in-progress downloads.
const TRANSIENT_SUFFIXES: [&str; 2] = [".tmp", ".crdownload"];

/// The only extension this service classifies.
const TARGET_SUFFIX: &str = ".exe";

/// Why a candidate was turned away. Rejections are expected traffic, not
/// errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The path denotes a directory.
    Directory,
    /// The path carries an in-progress download suffix.
    TransientSuffix,
    /// The path does not end in the target extension.
    WrongExtension,
    /// The path was already admitted earlier in this session.
    AlreadyProcessed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Directory => "path is a directory",
            Rejection::TransientSuffix => "transient download suffix",
            Rejection::WrongExtension => "not an .exe file",
            Rejection::AlreadyProcessed => "already processed this session",
        };
        f.write_str(reason)
    }
}

/// Extension rules plus the per-session dedup set.
///
/// The set lives and dies with one watch session: a fresh session starts
/// empty and may re-process paths an earlier session already saw.
#[derive(Debug, Default)]
pub struct AdmissionFilter {
    processed: HashSet<PathBuf>,
}

impl AdmissionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether a candidate enters the pipeline. An admitted path is
    /// recorded immediately, before any processing starts, so overlapping
    /// notifications for the same path can never run the pipeline twice.
    pub fn admit(&mut self, path: &Path) -> std::result::Result<(), Rejection> {
        if path.is_dir() {
            return Err(Rejection::Directory);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if TRANSIENT_SUFFIXES.iter().any(|s| name.ends_with(s)) {
            return Err(Rejection::TransientSuffix);
        }
        if !name.ends_with(TARGET_SUFFIX) {
            return Err(Rejection::WrongExtension);
        }

        if !self.processed.insert(path.to_path_buf()) {
            return Err(Rejection::AlreadyProcessed);
        }

        Ok(())
    }

    /// Number of paths admitted so far this session.
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}
