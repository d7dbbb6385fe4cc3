//! Logging setup.
//!
//! Console output always; an additional daily-rolling file layer is enabled
//! when `EXEWATCH_LOG_DIR` is set. The returned guard must be held for the
//! lifetime of the process so the non-blocking file writer flushes on exit.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default log filter directive.
pub const DEFAULT_LOG_FILTER: &str = "exewatch=info,inference_client=info,sqlx=warn";

/// Initialize the global tracing subscriber.
pub fn init() -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let file_writer = std::env::var("EXEWATCH_LOG_DIR").ok().map(|dir| {
        let appender = tracing_appender::rolling::daily(dir, "exewatch.log");
        tracing_appender::non_blocking(appender)
    });

    match file_writer {
        Some((writer, guard)) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            None
        }
    }
}
