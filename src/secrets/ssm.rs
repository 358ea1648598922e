//! AWS SSM Parameter Store source

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_ssm::Client;

use crate::config::secrets;

use super::{FetchError, SecretSource};

/// Reads SecureString parameters from SSM
pub struct SsmSource {
    client: Client,
}

impl SsmSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a source from the default AWS credential and region chain
    pub async fn from_env() -> Self {
        let shared_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self::new(Client::new(&shared_config))
    }
}

#[async_trait]
impl SecretSource for SsmSource {
    async fn fetch(&self, path: &str) -> std::result::Result<String, FetchError> {
        let output = self
            .client
            .get_parameter()
            .name(path)
            .with_decryption(true)
            .send()
            .await
            .map_err(|err| {
                if err.code() == Some(secrets::THROTTLING_ERROR_CODE) {
                    FetchError::Throttled(err.message().unwrap_or("rate exceeded").to_string())
                } else {
                    FetchError::Failed(DisplayErrorContext(&err).to_string())
                }
            })?;

        output
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_string)
            .ok_or_else(|| FetchError::Failed(format!("parameter '{}' has no value", path)))
    }
}
