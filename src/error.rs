//! Error types for piff-export
//!
//! This module provides the error taxonomy for the export service, including:
//! - Authorization failures (missing credential, insufficient role)
//! - Upstream failures, with verbatim passthrough of metadata service errors
//! - Per-record failures (image read, decode, unsupported format, serialization)
//! - HTTP status code mapping for API integration

use axum::body::Bytes;
use thiserror::Error;

/// Result type alias for piff-export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for piff-export
///
/// Every failure aborts the export it occurred in. Only [`Error::Upstream`]
/// is forwarded to the caller verbatim; everything else is reported with a
/// short diagnostic.
#[derive(Debug, Error)]
pub enum Error {
    /// No credential was presented while role-gating is enabled
    #[error("missing credential")]
    AuthMissing,

    /// The credential was refused or resolved to a non-administrative role
    #[error("insufficient role: {reason}")]
    AuthRejected {
        /// Why authorization failed (resolved role, or the auth service verdict)
        reason: String,
    },

    /// Network-level failure reaching the metadata or authorization service
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The metadata service answered with a non-success status
    #[error("upstream responded with status {status}")]
    Upstream {
        /// Status code returned by the metadata service
        status: u16,
        /// Raw response body returned by the metadata service
        body: Bytes,
    },

    /// Malformed JSON from upstream or malformed image bytes
    #[error("couldn't decode {what}: {reason}")]
    Decode {
        /// What was being decoded (e.g. "metadata response", "image")
        what: String,
        /// Underlying decoder message
        reason: String,
    },

    /// The image is a recognized format that the export does not handle
    #[error("couldn't handle format {0}")]
    UnsupportedFormat(String),

    /// The source image couldn't be read from its storage location
    #[error("couldn't read image {location}: {reason}")]
    ImageRead {
        /// Storage location (path or URL) of the image
        location: String,
        /// Underlying read failure
        reason: String,
    },

    /// Annotation document serialization failed
    #[error("couldn't serialize piFF: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing or finalizing the zip archive failed
    #[error("couldn't write archive: {0}")]
    ArchiveWrite(#[from] zip::result::ZipError),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "DATABASE_API_URL")
        key: Option<String>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

impl Error {
    /// Build a [`Error::Decode`] for the given subject
    pub fn decode(what: impl Into<String>, reason: impl ToString) -> Self {
        Error::Decode {
            what: what.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`Error::ImageRead`] for the given storage location
    pub fn image_read(location: impl Into<String>, reason: impl ToString) -> Self {
        Error::ImageRead {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - no credential presented
            Error::AuthMissing => 400,

            // 401 Unauthorized - credential refused or role too low
            Error::AuthRejected { .. } => 401,

            // Passthrough of the metadata service's own status
            Error::Upstream { status, .. } => *status,

            // 500 Internal Server Error - everything else
            Error::UpstreamUnavailable(_) => 500,
            Error::Decode { .. } => 500,
            Error::UnsupportedFormat(_) => 500,
            Error::ImageRead { .. } => 500,
            Error::Serialization(_) => 500,
            Error::ArchiveWrite(_) => 500,
            Error::Config { .. } => 500,
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::AuthMissing => "auth_missing",
            Error::AuthRejected { .. } => "auth_rejected",
            Error::UpstreamUnavailable(_) => "upstream_unavailable",
            Error::Upstream { .. } => "upstream_error",
            Error::Decode { .. } => "decode_error",
            Error::UnsupportedFormat(_) => "unsupported_format",
            Error::ImageRead { .. } => "image_read_error",
            Error::Serialization(_) => "serialization_error",
            Error::ArchiveWrite(_) => "archive_write_error",
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}
