use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use exewatch::api::server::{ApiServerConfig, AppState, start_server};
use exewatch::config::AppConfig;
use exewatch::database;
use exewatch::database::repositories::{PredictionRepository, SqlxPredictionRepository};
use exewatch::session::SessionController;
use exewatch::sink::{DbSink, LogFileSink, OutcomeSink};
use exewatch::watcher::WatcherConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = exewatch::logging::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let app_config = AppConfig::from_env_or_default();

    // Initialize database
    let pool = database::init_pool(&app_config.database_url).await?;
    database::run_migrations(&pool).await?;

    let predictions: Arc<dyn PredictionRepository> =
        Arc::new(SqlxPredictionRepository::new(pool.clone()));
    let sinks: Vec<Arc<dyn OutcomeSink>> = vec![
        Arc::new(LogFileSink::new(&app_config.predictions_log)),
        Arc::new(DbSink::new(predictions.clone())),
    ];

    let watcher_config = WatcherConfig::default();
    let controller = Arc::new(SessionController::new(
        app_config.infer_base_url.clone(),
        sinks.clone(),
        watcher_config.clone(),
    ));

    let state = AppState {
        start_time: Instant::now(),
        controller: controller.clone(),
        predictions,
        sinks,
        config: Arc::new(app_config),
        watcher_config,
    };

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                shutdown.cancel();
            }
        });
    }

    let api_config = ApiServerConfig::from_env_or_default();
    start_server(&api_config, state, shutdown).await?;

    // Best-effort: wind down an active watch session before exit.
    if controller.status().await.monitoring {
        if let Err(e) = controller.stop().await {
            tracing::warn!("Failed to stop watch session on shutdown: {}", e);
        }
    }

    tracing::info!("exewatch shut down cleanly");
    Ok(())
}
