//! Directory watching and the per-file processing pipeline.
//!
//! The native notification subscription ([`events`]) feeds a channel of
//! [`CandidateFile`] values; the watch loop ([`service`]) drains it, running
//! each candidate through admission ([`admission`]), stabilization
//! ([`stabilize`]), and the remote two-stage pipeline. Keeping the loop on a
//! plain channel receiver means tests can inject events without a real
//! filesystem watcher.

pub mod admission;
pub mod events;
pub mod service;
pub mod stabilize;

pub use admission::{AdmissionFilter, Rejection};
pub use events::CandidateFile;
pub use service::{FilePipeline, WatcherConfig, run_watch_loop};
pub use stabilize::StabilizationGate;
