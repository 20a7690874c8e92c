//! Clients for the upstream services
//!
//! - [`metadata`]: picture records from the metadata service
//! - [`auth`]: credential to role resolution

pub mod auth;
pub mod metadata;

pub use auth::{AuthClient, RoleResolver};
pub use metadata::MetadataClient;

use crate::error::{Error, Result};
use reqwest::header::HeaderValue;

/// Rebuild a caller's credential, byte for byte, as an outgoing
/// `Authorization` value
pub(crate) fn authorization_value(credential: &[u8]) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_bytes(credential).map_err(|e| Error::AuthRejected {
        reason: format!("credential is not a valid header value: {}", e),
    })?;
    value.set_sensitive(true);
    Ok(value)
}
