//! Watch-session lifecycle.

pub mod controller;

pub use controller::{MonitorStatus, SessionController, SessionState};
