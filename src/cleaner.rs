//! Cleanup workflow
//!
//! Authenticate, search every project for the terminated instance, delete the
//! first matching server and report the outcome as structured records.

use log::debug;

use crate::asa::{
    AsaClient, CredentialPaths, InventoryClient, Project, RateLimitSnapshot, Server,
    TokenProvider,
};
use crate::error::Result;
use crate::logging::{EventLogger, LogEvent};
use crate::secrets::SecretClient;

/// Result of walking the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// First server (in project order, then server order) bound to the instance
    Matched { project: Project, server: Server },
    /// Every page of every project was read without a match
    Exhausted,
}

/// What a cleanup run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed {
        project: String,
        hostname: String,
        server_id: String,
    },
    NotFound,
}

/// Outcome of a run plus the last rate-limit snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub outcome: CleanupOutcome,
    pub ratelimit: RateLimitSnapshot,
}

/// Find the first server bound to `instance_id`
///
/// Projects are read lazily: servers of later projects are never queried
/// once a match is found.
pub async fn search(inventory: &InventoryClient<'_>, instance_id: &str) -> Result<SearchOutcome> {
    for project in inventory.get_projects().await? {
        let servers = inventory.get_servers(&project).await?;
        if let Some(server) = servers.into_iter().find(|s| s.is_instance(instance_id)) {
            return Ok(SearchOutcome::Matched { project, server });
        }
    }
    Ok(SearchOutcome::Exhausted)
}

/// Removes one terminated instance from ASA
pub struct Cleaner {
    client: AsaClient,
    secrets: SecretClient,
    credentials: CredentialPaths,
    log: EventLogger,
}

impl Cleaner {
    pub fn new(
        client: AsaClient,
        secrets: SecretClient,
        credentials: CredentialPaths,
        log: EventLogger,
    ) -> Self {
        Self {
            client,
            secrets,
            credentials,
            log,
        }
    }

    /// Run the whole workflow for one instance
    pub async fn run(&self, instance_id: &str) -> Result<CleanupReport> {
        self.log.info(
            LogEvent::new(
                "lambda_start",
                "run",
                format!("ASA Cleaner triggered for instance {}", instance_id),
            )
            .field("instance_id", instance_id),
        );

        let outcome = self.clean_asa(instance_id).await?;

        let ratelimit = self.client.ratelimit();
        let remaining = ratelimit
            .remaining()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        self.log.info(
            LogEvent::new(
                "api_ratelimit_remaining",
                "run",
                format!("API requests left: {}", remaining),
            )
            .field("ratelimit_remaining", ratelimit.remaining()),
        );

        Ok(CleanupReport { outcome, ratelimit })
    }

    async fn clean_asa(&self, instance_id: &str) -> Result<CleanupOutcome> {
        let token = TokenProvider::new(&self.client, &self.secrets, &self.credentials)
            .get_token()
            .await?;
        let inventory = InventoryClient::new(&self.client, token);

        match search(&inventory, instance_id).await? {
            SearchOutcome::Matched { project, server } => {
                let status = inventory.delete_server(&project, &server).await?;
                debug!("Delete of server '{}' returned {}", server.id, status);

                self.log.info(
                    LogEvent::new(
                        "instance_removed",
                        "clean_asa",
                        format!("Removed {} from {}", server.hostname, project.name),
                    )
                    .field("instance_id", instance_id)
                    .field("asa_project", project.name.as_str())
                    .field("asa_hostname", server.hostname.as_str()),
                );

                Ok(CleanupOutcome::Removed {
                    project: project.name,
                    hostname: server.hostname,
                    server_id: server.id,
                })
            }
            SearchOutcome::Exhausted => {
                self.log.info(
                    LogEvent::new(
                        "asa_node_not_found",
                        "clean_asa",
                        format!("Instance {} does not exist in ASA", instance_id),
                    )
                    .field("instance_id", instance_id),
                );
                Ok(CleanupOutcome::NotFound)
            }
        }
    }
}
