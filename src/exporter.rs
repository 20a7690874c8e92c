//! Request-level export orchestration
//!
//! One export runs through [`ExportStage`]s in order. Any failure ends the
//! export at the stage it occurred in; nothing is retried and no partial
//! archive is produced.

use crate::archive::{ArchiveBuilder, StorageReader};
use crate::client::{AuthClient, MetadataClient, RoleResolver};
use crate::config::Config;
use crate::error::{Error, Result, ToHttpStatus};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Stages of a single export
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportStage {
    /// Checking the caller's role (only with role-gating)
    Authorizing,
    /// Fetching records from the metadata service
    Fetching,
    /// Building the archive
    Building,
    /// Sending the archive to the caller
    Streaming,
    /// Export delivered
    Done,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::Authorizing => "authorizing",
            ExportStage::Fetching => "fetching",
            ExportStage::Building => "building",
            ExportStage::Streaming => "streaming",
            ExportStage::Done => "done",
        };
        f.write_str(name)
    }
}

struct RoleGate {
    resolver: Arc<dyn RoleResolver>,
    admin_role: String,
}

/// Runs exports: authorize, fetch, build
///
/// Holds only read-only collaborators; each call to [`Exporter::export`]
/// builds its archive from scratch.
pub struct Exporter {
    metadata: MetadataClient,
    builder: ArchiveBuilder,
    gate: Option<RoleGate>,
}

impl Exporter {
    /// Create an exporter without role-gating
    pub fn new(metadata: MetadataClient, builder: ArchiveBuilder) -> Self {
        Self {
            metadata,
            builder,
            gate: None,
        }
    }

    /// Require credentials resolving to `admin_role`
    pub fn with_role_gate(
        mut self,
        resolver: Arc<dyn RoleResolver>,
        admin_role: impl Into<String>,
    ) -> Self {
        self.gate = Some(RoleGate {
            resolver,
            admin_role: admin_role.into(),
        });
        self
    }

    /// Wire the production collaborators described by `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("piff-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        let metadata = MetadataClient::new(client.clone(), config.database_api_url.clone());
        let builder = ArchiveBuilder::new(Arc::new(StorageReader::new(client.clone())));
        let exporter = Exporter::new(metadata, builder);

        Ok(match &config.auth_api_url {
            Some(url) => exporter.with_role_gate(
                Arc::new(AuthClient::new(client, url.clone())),
                config.admin_role.clone(),
            ),
            None => exporter,
        })
    }

    /// Whether exports require an administrative credential
    pub fn role_gated(&self) -> bool {
        self.gate.is_some()
    }

    /// Produce the export archive for a caller presenting `credential`
    ///
    /// `credential` is the raw `Authorization` header value. It is never
    /// decoded, only checked for blankness and forwarded.
    pub async fn export(&self, credential: Option<&[u8]>) -> Result<Vec<u8>> {
        let mut stage = ExportStage::Authorizing;
        let result = self.run(credential, &mut stage).await;
        if let Err(e) = &result {
            warn!(
                stage = %stage,
                code = e.error_code(),
                error = %e,
                "export failed"
            );
        }
        result
    }

    async fn run(&self, credential: Option<&[u8]>, stage: &mut ExportStage) -> Result<Vec<u8>> {
        let credential = credential.filter(|c| !c.iter().all(u8::is_ascii_whitespace));

        if let Some(gate) = &self.gate {
            debug!(stage = %stage, "checking role");
            let credential = credential.ok_or(Error::AuthMissing)?;
            let role = gate.resolver.resolve(credential).await?;
            if role.as_str() != gate.admin_role {
                return Err(Error::AuthRejected {
                    reason: format!("role '{}' may not export", role),
                });
            }
        }

        *stage = ExportStage::Fetching;
        debug!(stage = %stage, url = %self.metadata.retrieve_all_url(), "fetching records");
        let records = self.metadata.fetch_all(credential).await?;

        *stage = ExportStage::Building;
        debug!(stage = %stage, records = records.len(), "building archive");
        let archive = self.builder.build(&records).await?;

        info!(
            records = records.len(),
            bytes = archive.len(),
            "export ready"
        );
        Ok(archive)
    }
}
