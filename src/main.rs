//! piff-export server binary
//!
//! Reads its configuration from the environment (and an optional `.env`
//! file), then serves the export API until SIGTERM or Ctrl+C.

use piff_export::{Config, Exporter, ToHttpStatus, api};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("piff_export=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "piff-export exited");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> piff_export::Result<()> {
    let config = Arc::new(Config::from_env()?);
    let exporter = Arc::new(Exporter::from_config(&config)?);

    api::start_api_server(exporter, config).await
}
