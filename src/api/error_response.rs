//! HTTP error response handling for the API
//!
//! Metadata service failures are relayed with their own status and body.
//! Every other error becomes a short plain-text diagnostic prefixed with
//! [`DIAGNOSTIC_PREFIX`].

use crate::error::{Error, ToHttpStatus};
use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// Prefix of every diagnostic body produced by this service
pub const DIAGNOSTIC_PREFIX: &str = "[MICRO-EXPORT]";

/// Render `message` as an ASCII diagnostic line
pub fn diagnostic(message: &str) -> String {
    let ascii: String = message
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect();
    format!("{} {}", DIAGNOSTIC_PREFIX, ascii)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Error::Upstream { status, body } = self {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            return (status, Body::from(body)).into_response();
        }

        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status_code,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            diagnostic(&self.to_string()),
        )
            .into_response()
    }
}
