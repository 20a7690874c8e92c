//! Metadata service client

use super::authorization_value;
use crate::error::{Error, Result};
use crate::types::PictureRecord;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, warn};

/// Path of the "all records" endpoint, relative to the service base URL
pub const RETRIEVE_ALL_PATH: &str = "/db/retrieve/all";

/// Fetches picture records from the metadata service
#[derive(Clone, Debug)]
pub struct MetadataClient {
    client: reqwest::Client,
    base_url: String,
}

impl MetadataClient {
    /// Create a client for the service at `base_url`
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Full URL of the "all records" endpoint
    pub fn retrieve_all_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), RETRIEVE_ALL_PATH)
    }

    /// Fetch every record, forwarding `credential` unchanged as the
    /// `Authorization` header
    ///
    /// A non-success answer is returned as [`Error::Upstream`] carrying the
    /// service's status and body untouched.
    pub async fn fetch_all(&self, credential: Option<&[u8]>) -> Result<Vec<PictureRecord>> {
        let url = self.retrieve_all_url();
        let mut request = self.client.get(&url);
        if let Some(credential) = credential {
            request = request.header(AUTHORIZATION, authorization_value(credential)?);
        }

        let response = request.send().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("couldn't reach metadata service at {}: {}", url, e))
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("couldn't read metadata response: {}", e))
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "metadata service returned an error");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        // An empty collection comes back as `null`
        let records: Option<Vec<PictureRecord>> = serde_json::from_slice(&body)
            .map_err(|e| Error::decode("metadata response", e))?;
        let records = records.unwrap_or_default();

        debug!(records = records.len(), "fetched records");
        Ok(records)
    }
}
