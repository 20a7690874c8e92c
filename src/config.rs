//! Configuration types for piff-export

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

/// Environment variable holding the metadata service base URL
pub const DATABASE_API_URL_ENV: &str = "DATABASE_API_URL";
/// Environment variable holding the authorization service base URL
pub const AUTH_API_URL_ENV: &str = "AUTH_API_URL";
/// Environment variable holding the role allowed to export
pub const ADMIN_ROLE_ENV: &str = "EXPORT_ADMIN_ROLE";
/// Environment variable holding the listen address
pub const BIND_ADDRESS_ENV: &str = "EXPORT_BIND_ADDRESS";

/// Main configuration for the export service
///
/// Upstream URLs are read once at startup and passed explicitly to the
/// collaborators that need them; nothing here is mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the metadata service (default: the in-cluster database API)
    #[serde(default = "default_database_api_url")]
    pub database_api_url: String,

    /// Base URL of the authorization service
    ///
    /// When set, every export must present a credential resolving to
    /// [`Config::admin_role`]. When unset, exports are not role-gated.
    #[serde(default)]
    pub auth_api_url: Option<String>,

    /// Role allowed to export (default: "admin")
    #[serde(default = "default_admin_role")]
    pub admin_role: String,

    /// Address to bind to (default: 0.0.0.0:22022)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_api_url: default_database_api_url(),
            auth_api_url: None,
            admin_role: default_admin_role(),
            bind_address: default_bind_address(),
        }
    }
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Missing or empty keys fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        if let Some(url) = get(DATABASE_API_URL_ENV) {
            config.database_api_url = url;
        }
        config.auth_api_url = get(AUTH_API_URL_ENV);
        if let Some(role) = get(ADMIN_ROLE_ENV) {
            config.admin_role = role;
        }
        if let Some(address) = get(BIND_ADDRESS_ENV) {
            config.bind_address = address.parse().map_err(|e| Error::Config {
                message: format!("invalid bind address '{}': {}", address, e),
                key: Some(BIND_ADDRESS_ENV.to_string()),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the configured service URLs are absolute http(s) URLs
    pub fn validate(&self) -> Result<()> {
        validate_service_url(&self.database_api_url, DATABASE_API_URL_ENV)?;
        if let Some(url) = &self.auth_api_url {
            validate_service_url(url, AUTH_API_URL_ENV)?;
        }
        Ok(())
    }
}

fn validate_service_url(value: &str, key: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| Error::Config {
        message: format!("invalid service URL '{}': {}", value, e),
        key: Some(key.to_string()),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config {
            message: format!("unsupported scheme '{}' in '{}'", other, value),
            key: Some(key.to_string()),
        }),
    }
}

fn default_database_api_url() -> String {
    "http://database-api.gitlab-managed-apps.svc.cluster.local:8080".to_string()
}

fn default_admin_role() -> String {
    "admin".to_string()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 22022))
}
