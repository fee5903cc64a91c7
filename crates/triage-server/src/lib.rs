pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;
pub use error::{ApiError, ConfigError, ServerError};
pub use routes::{router, BASE_PATH};

use tokio::net::TcpListener;
use tracing::info;
use triage_engine::DiagnosisEngine;

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(engine: DiagnosisEngine, config: &ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;

    info!("Backend running at: http://{}{}/", config.bind, BASE_PATH);

    axum::serve(listener, router(engine, config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
