pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod models;
pub mod routes;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::ServeError;

pub use handlers::{detect_storage_change, Detection, EXPECTED_SERVICE_NAME};

/// Bind the listener for the configured host and port
pub async fn bind(config: &Config) -> Result<TcpListener, ServeError> {
    let addr = config.bind_addr();

    TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })
}

/// Serve `app` on `listener` until the server stops
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServeError> {
    axum::serve(listener, app).await.map_err(ServeError::Serve)
}
