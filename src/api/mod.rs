//! REST API server module
//!
//! Exposes the archive export over HTTP, with a liveness message, a health
//! check and the OpenAPI document next to it.

use crate::{Config, Exporter, Result};
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// - `GET /export/piff` - Zip archive of every PiFF document and its image
/// - `GET /export` - Liveness message
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
pub fn create_router(exporter: Arc<Exporter>) -> Router {
    let state = AppState::new(exporter);

    Router::new()
        .route("/export/piff", get(routes::export_piff))
        .route("/export", get(routes::home))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the API server on the configured bind address.
///
/// Runs until the server fails or a shutdown signal arrives. Exports in
/// flight when the signal arrives are allowed to finish.
///
/// # Example
///
/// ```no_run
/// use piff_export::{Config, Exporter};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::from_env()?);
/// let exporter = Arc::new(Exporter::from_config(&config)?);
///
/// piff_export::api::start_api_server(exporter, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(exporter: Arc<Exporter>, config: Arc<Config>) -> Result<()> {
    let bind_address = config.bind_address;

    tracing::info!(
        address = %bind_address,
        metadata = %config.database_api_url,
        role_gated = exporter.role_gated(),
        "Starting API server"
    );

    let app = create_router(exporter);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::shutdown_signal())
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
