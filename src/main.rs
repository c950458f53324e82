use std::sync::Arc;

use poobel_store::api;
use poobel_store::config::Config;
use poobel_store::error::AppError;
use poobel_store::persistence::{FileStorage, KeyValueStorage, MemoryStorage};
use poobel_store::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let storage: Arc<dyn KeyValueStorage> = match &config.storage_dir {
        Some(dir) => {
            tracing::info!(storage_dir = %dir.display(), "persisting store to disk");
            Arc::new(FileStorage::new(dir)?)
        }
        None => {
            tracing::info!("STORAGE_DIR not set; store lives in memory only");
            Arc::new(MemoryStorage::new())
        }
    };

    let shared_state = Arc::new(AppState::new(
        storage,
        config.storage_key.clone(),
        config.event_buffer_size,
        config.chat,
    ));

    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
