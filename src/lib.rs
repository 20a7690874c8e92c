//! # piff-export
//!
//! Bulk export service for PiFF annotation documents.
//!
//! One request to `GET /export/piff` fetches every picture record from the
//! metadata service, files each record under a review-status folder, and
//! answers with a zip archive holding one PiFF document and one normalized
//! image (JPEG or PNG) per record.
//!
//! ## Quick Start
//!
//! ```no_run
//! use piff_export::{Config, Exporter};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::from_env()?);
//!     let exporter = Arc::new(Exporter::from_config(&config)?);
//!
//!     piff_export::api::start_api_server(exporter, config).await?;
//!     Ok(())
//! }
//! ```
//!
//! The archive can also be produced without the HTTP layer:
//!
//! ```no_run
//! # async fn example() -> piff_export::Result<()> {
//! let exporter = piff_export::Exporter::from_config(&piff_export::Config::default())?;
//! let archive: Vec<u8> = exporter.export(Some(b"Bearer token".as_slice())).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Archive assembly: classification, naming, documents, images
pub mod archive;
/// Clients for the metadata and authorization services
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Export orchestration
pub mod exporter;
/// PiFF documents and picture records
pub mod types;

// Re-export commonly used types
pub use archive::ArchiveBuilder;
pub use config::Config;
pub use error::{Error, Result, ToHttpStatus};
pub use exporter::{ExportStage, Exporter};
pub use types::{PictureRecord, PiffDocument};

/// Wait for a termination signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// Used as the graceful-shutdown trigger of [`api::start_api_server`].
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(term), Err(int)) => {
            tracing::error!(
                sigterm = %term,
                sigint = %int,
                "Could not register any signal handlers, using ctrl_c fallback"
            );
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Wait for a termination signal (Ctrl+C).
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
