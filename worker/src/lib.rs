//! HTTP service exposing a [`Worker`] on `POST /crack`.

pub mod handlers;

use std::net::SocketAddr;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use rangecrack_core::{
    messages::{ENDPOINT_CRACK, ENDPOINT_HEALTH},
    Worker,
};

use handlers::{handle_crack, handle_health};

/// The default port of a worker.
pub const DEFAULT_PORT: u16 = 5000;

/// Builds the routes of a worker service.
pub fn router(worker: Worker) -> Router {
    Router::new()
        .route(ENDPOINT_CRACK, post(handle_crack))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(worker))
}

/// Serves the worker until the process is stopped.
pub async fn serve(addr: SocketAddr, worker: Worker) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "Worker listening on {} ({} digests)",
        listener.local_addr()?,
        worker.hash_function()
    );

    axum::serve(listener, router(worker)).await?;

    Ok(())
}
