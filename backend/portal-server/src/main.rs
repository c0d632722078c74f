use portal_server::{AppState, ServerError, build_router, logger};
use portal_supervisor::{ServiceManager, ShutdownCoordinator};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::net::TcpListener;

const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional; PORTAL_* variables may come from it
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let mut config = portal_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = portal_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting portal-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics {
            message: e.to_string(),
        })?;

    // Bind first: with port 0 the real port feeds the in-process check URLs
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let actual_addr = listener.local_addr()?;
    config.server.port = actual_addr.port();
    info!("Server listening on {}", actual_addr);

    let manager = Arc::new(ServiceManager::from_config(&config).map_err(ServerError::from)?);
    info!("Managing {} unit(s)", manager.registry().len());

    let shutdown = ShutdownCoordinator::new();
    manager.spawn_monitor(&shutdown).await;

    // Histogram buckets are only drained on upkeep
    let upkeep_handle = metrics_handle.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(METRICS_UPKEEP_INTERVAL);
        loop {
            ticker.tick().await;
            upkeep_handle.run_upkeep();
        }
    });

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown_for_signal.shutdown();
    });

    let app_state = AppState::new(manager.clone()).with_metrics(metrics_handle);
    let app = build_router(app_state);

    // Start server with graceful shutdown
    info!("Server ready to accept connections");
    let mut guard = shutdown.subscribe_guard();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            guard.wait().await;
            info!("HTTP server draining");
        })
        .await?;

    // Terminate every process the portal spawned
    manager.shutdown().await;
    info!("Graceful shutdown complete");

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to listen for SIGTERM: {}", e);
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = wait_for_ctrl_c() => {}
        _ = terminate.recv() => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT (Ctrl+C), initiating graceful shutdown"),
        Err(e) => {
            error!("Failed to listen for SIGINT: {}", e);
            // Never resolve; shutdown must then come from SIGTERM
            std::future::pending::<()>().await;
        }
    }
}
