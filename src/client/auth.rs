//! Authorization service client

use super::authorization_value;
use crate::error::{Error, Result};
use crate::types::Role;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

/// Path of the role lookup endpoint, relative to the service base URL
pub const ROLE_PATH: &str = "/auth/role";

/// Resolves a credential to the role of its holder
#[async_trait]
pub trait RoleResolver: Send + Sync {
    /// Resolve `credential`, failing with [`Error::AuthRejected`] when the
    /// authorization service refuses it
    async fn resolve(&self, credential: &[u8]) -> Result<Role>;
}

#[derive(Debug, Deserialize)]
struct RoleResponse {
    #[serde(rename = "Role", alias = "role")]
    role: String,
}

/// HTTP client for the authorization service
#[derive(Clone, Debug)]
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for the service at `base_url`
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Full URL of the role lookup endpoint
    pub fn role_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ROLE_PATH)
    }
}

#[async_trait]
impl RoleResolver for AuthClient {
    async fn resolve(&self, credential: &[u8]) -> Result<Role> {
        let url = self.role_url();
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, authorization_value(credential)?)
            .send()
            .await
            .map_err(|e| {
                Error::UpstreamUnavailable(format!(
                    "couldn't reach authorization service at {}: {}",
                    url, e
                ))
            })?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(Error::AuthRejected {
                    reason: format!("credential refused ({})", status.as_u16()),
                });
            }
            s if !s.is_success() => {
                return Err(Error::UpstreamUnavailable(format!(
                    "authorization service answered {}",
                    s.as_u16()
                )));
            }
            _ => {}
        }

        let body = response.bytes().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("couldn't read authorization response: {}", e))
        })?;
        let parsed: RoleResponse = serde_json::from_slice(&body)
            .map_err(|e| Error::decode("authorization response", e))?;

        Ok(Role(parsed.role))
    }
}
