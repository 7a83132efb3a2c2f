//! Predict Cache - A prediction-serving endpoint
//!
//! Serves a pre-trained model behind a TTL cache, with a cap on concurrent
//! model calls and best-effort recording of fresh predictions.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use predict_cache::{
    api::create_router, persistence::PredictionSink, predictor::LinearModel, spawn_cleanup_task,
    AppState, Config,
};

/// Main entry point for the prediction server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Load the model artifact (fatal on failure)
/// 4. Select the persistence sink (degrades to disabled on failure)
/// 5. Start background TTL cleanup task
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "predict_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting prediction server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, cache_ttl={}s, max_concurrent={}, port={}, cleanup_interval={}s",
        config.max_entries,
        config.cache_ttl,
        config.max_concurrent,
        config.server_port,
        config.cleanup_interval
    );

    let model = LinearModel::load(&config.model_path)
        .with_context(|| format!("loading model from {}", config.model_path.display()))?;
    info!("Model loaded from {}", config.model_path.display());

    let sink = PredictionSink::from_config(config.persist_enabled, &config.persist_credentials);

    let persistence_active = sink.is_active();
    let state = AppState::from_config(&config, Arc::new(model), sink);
    info!(
        permits = state.service.limiter().capacity(),
        persistence = persistence_active,
        "Prediction service ready"
    );

    let cleanup_handle = spawn_cleanup_task(state.service.cache().clone(), config.cleanup_interval);
    info!("Background cleanup task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the cleanup task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cleanup task aborted");
}
