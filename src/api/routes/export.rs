//! Export handlers.

use crate::api::AppState;
use crate::api::error_response::diagnostic;
use crate::error::Error;
use crate::exporter::ExportStage;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Media type of the export archive
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Download name suggested to clients
pub const ARCHIVE_FILE_NAME: &str = "piff-export.zip";

/// GET /export/piff - Export every PiFF document with its image
#[utoipa::path(
    get,
    path = "/export/piff",
    tag = "export",
    params(
        ("Authorization" = Option<String>, Header, description = "Credential forwarded to the metadata service; required when role-gating is enabled")
    ),
    responses(
        (status = 200, description = "Zip archive of PiFF documents and images", content_type = "application/zip"),
        (status = 400, description = "Missing credential"),
        (status = 401, description = "Insufficient role"),
        (status = 500, description = "Export failed")
    ),
    security(
        (),
        ("bearer" = [])
    )
)]
pub async fn export_piff(State(state): State<AppState>, headers: HeaderMap) -> Response {
    // Opaque bytes, forwarded even when they are not visible ASCII
    let credential = headers.get(header::AUTHORIZATION).map(|value| value.as_bytes());

    match state.exporter.export(credential).await {
        Ok(archive) => archive_response(archive),
        Err(e) => e.into_response(),
    }
}

fn archive_response(archive: Vec<u8>) -> Response {
    tracing::debug!(
        stage = %ExportStage::Streaming,
        bytes = archive.len(),
        "sending archive"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, ARCHIVE_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, archive.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
        )
        .body(Body::from(archive));

    match response {
        Ok(response) => {
            tracing::debug!(stage = %ExportStage::Done, "export delivered");
            response
        }
        Err(e) => Error::ApiServerError(e.to_string()).into_response(),
    }
}

/// GET /export - Liveness message
#[utoipa::path(
    get,
    path = "/export",
    tag = "export",
    responses(
        (status = 200, description = "Service is up", content_type = "text/plain")
    )
)]
pub async fn home() -> impl IntoResponse {
    diagnostic("Welcome home!")
}
