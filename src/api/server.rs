use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::error::{GigstressError, Result};

/// Start the API server and block until shutdown.
pub async fn start_api_server(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| GigstressError::Internal(format!("invalid bind address: {e}")))?;
    info!("API server listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
