//! Service token exchange

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::api;
use crate::error::{CleanerError, Result};
use crate::secrets::SecretClient;

use super::AsaClient;

/// Bearer token authorizing inventory calls for one run
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Secret store paths of the API key pair
#[derive(Debug, Clone)]
pub struct CredentialPaths {
    pub key_id: String,
    pub key_secret: String,
}

#[derive(Serialize)]
struct ServiceTokenRequest<'a> {
    key_id: &'a str,
    key_secret: &'a str,
}

#[derive(Deserialize, Debug)]
struct ServiceTokenResponse {
    #[serde(default)]
    bearer_token: Option<String>,
}

/// Exchanges the API key pair for a bearer token
pub struct TokenProvider<'a> {
    client: &'a AsaClient,
    secrets: &'a SecretClient,
    paths: &'a CredentialPaths,
}

impl<'a> TokenProvider<'a> {
    pub fn new(client: &'a AsaClient, secrets: &'a SecretClient, paths: &'a CredentialPaths) -> Self {
        Self {
            client,
            secrets,
            paths,
        }
    }

    /// Fetch both secrets and exchange them for a bearer token
    pub async fn get_token(&self) -> Result<BearerToken> {
        let key_id = self
            .secrets
            .get(&self.paths.key_id)
            .await
            .map_err(|e| CleanerError::Auth(format!("could not read API key id: {}", e)))?;
        let key_secret = self
            .secrets
            .get(&self.paths.key_secret)
            .await
            .map_err(|e| CleanerError::Auth(format!("could not read API key secret: {}", e)))?;

        let url = self.client.team_url(api::SERVICE_TOKEN);
        debug!("Requesting service token from: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&ServiceTokenRequest {
                key_id: &key_id,
                key_secret: &key_secret,
            })
            .send()
            .await?;
        self.client.record_ratelimit(&response);

        let status = response.status().as_u16();
        let body = response.text().await?;
        let parsed: ServiceTokenResponse = serde_json::from_str(&body).map_err(|e| {
            CleanerError::Auth(format!(
                "unparseable service token response (status {}): {}",
                status, e
            ))
        })?;

        match parsed.bearer_token.filter(|token| !token.is_empty()) {
            Some(token) => Ok(BearerToken::new(token)),
            None => Err(CleanerError::Auth(format!(
                "service token response (status {}) has no bearer_token",
                status
            ))),
        }
    }
}
