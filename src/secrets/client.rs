//! Secret client with throttling retry

use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::secrets;
use crate::error::{CleanerError, Result};
use crate::logging::{EventLogger, LogEvent};

use super::{FetchError, SecretSource};

/// Delays applied before each retry of a throttled fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    backoff: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(secrets::THROTTLE_BACKOFF.to_vec())
    }
}

impl RetryPolicy {
    /// One retry per entry in `backoff`
    pub fn new(backoff: Vec<Duration>) -> Self {
        Self { backoff }
    }

    /// Delay to wait after the given (1-based) failed attempt, `None` when exhausted
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        let index = usize::try_from(attempt).ok()?.checked_sub(1)?;
        self.backoff.get(index).copied()
    }
}

/// Reads secrets, retrying when the store throttles us
pub struct SecretClient {
    source: Arc<dyn SecretSource>,
    policy: RetryPolicy,
    log: EventLogger,
}

impl SecretClient {
    pub fn new(source: Arc<dyn SecretSource>, log: EventLogger) -> Self {
        Self {
            source,
            policy: RetryPolicy::default(),
            log,
        }
    }

    /// Replace the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch the decrypted value stored at `path`
    ///
    /// Throttled fetches are retried after each delay in the policy. Any other
    /// failure, or a throttle after the last retry, is returned immediately.
    pub async fn get(&self, path: &str) -> Result<String> {
        if path.trim().is_empty() {
            return Err(CleanerError::Config(
                "secret path must not be empty".to_string(),
            ));
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!("Fetching secret '{}' (attempt {})", path, attempt);

            match self.source.fetch(path).await {
                Ok(value) => return Ok(value),
                Err(FetchError::Throttled(reason)) => {
                    let Some(delay) = self.policy.delay_after(attempt) else {
                        debug!("Giving up on '{}': {}", path, reason);
                        return Err(CleanerError::Throttled {
                            path: path.to_string(),
                            attempts: attempt,
                        });
                    };

                    self.log.warn(
                        LogEvent::new(
                            "ssm_throttled",
                            "get_parameter",
                            format!("SSM {} throttled, retry #{}", path, attempt),
                        )
                        .field("path", path)
                        .field("attempt", attempt),
                    );
                    sleep(delay).await;
                }
                Err(FetchError::Failed(message)) => {
                    return Err(CleanerError::Secret {
                        path: path.to_string(),
                        message,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::testing::ScriptedSource;

    fn client_for(source: ScriptedSource) -> (SecretClient, Arc<ScriptedSource>, EventLogger) {
        let source = Arc::new(source);
        let log = EventLogger::new(None);
        let client = SecretClient::new(source.clone(), log.clone())
            .with_policy(RetryPolicy::new(vec![Duration::ZERO; 3]));
        (client, source, log)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_after(3), Some(Duration::from_secs(3)));
        assert_eq!(policy.delay_after(4), None);
        assert_eq!(policy.delay_after(0), None);
    }

    #[tokio::test]
    async fn test_get_first_try() {
        let (client, source, log) =
            client_for(ScriptedSource::new().push("/asa/key", Ok("key-id")));

        assert_eq!(client.get("/asa/key").await.unwrap(), "key-id");
        assert_eq!(source.calls_for("/asa/key"), 1);
        assert!(log.records().is_empty());
    }

    #[tokio::test]
    async fn test_get_recovers_after_two_throttles() {
        let (client, source, log) = client_for(
            ScriptedSource::new()
                .throttled("/asa/key", 2)
                .push("/asa/key", Ok("key-id")),
        );

        assert_eq!(client.get("/asa/key").await.unwrap(), "key-id");
        assert_eq!(source.calls_for("/asa/key"), 3);

        let warnings = log.records_of_type("ssm_throttled");
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0]["attempt"], 1);
        assert_eq!(warnings[1]["attempt"], 2);
        assert_eq!(warnings[1]["path"], "/asa/key");
        assert_eq!(warnings[1]["level"], "WARN");
    }

    #[tokio::test]
    async fn test_get_gives_up_after_four_throttles() {
        let (client, source, log) = client_for(
            ScriptedSource::new()
                .throttled("/asa/key", 4)
                .push("/asa/key", Ok("never-reached")),
        );

        match client.get("/asa/key").await.unwrap_err() {
            CleanerError::Throttled { path, attempts } => {
                assert_eq!(path, "/asa/key");
                assert_eq!(attempts, 4);
            }
            other => panic!("Expected CleanerError::Throttled, got {:?}", other),
        }
        assert_eq!(source.calls_for("/asa/key"), 4);
        assert_eq!(log.records_of_type("ssm_throttled").len(), 3);
    }

    #[tokio::test]
    async fn test_get_other_failure_is_not_retried() {
        let (client, source, _log) = client_for(ScriptedSource::new().push(
            "/asa/key",
            Err(FetchError::Failed("AccessDeniedException".to_string())),
        ));

        match client.get("/asa/key").await.unwrap_err() {
            CleanerError::Secret { path, message } => {
                assert_eq!(path, "/asa/key");
                assert!(message.contains("AccessDenied"));
            }
            other => panic!("Expected CleanerError::Secret, got {:?}", other),
        }
        assert_eq!(source.calls_for("/asa/key"), 1);
    }

    #[tokio::test]
    async fn test_get_rejects_empty_path() {
        let (client, source, _log) = client_for(ScriptedSource::new());

        let err = client.get("  ").await.unwrap_err();
        assert!(matches!(err, CleanerError::Config(_)));
        assert_eq!(source.calls_for("  "), 0);
    }

    #[tokio::test]
    async fn test_secret_value_never_logged() {
        let (client, _source, log) = client_for(
            ScriptedSource::new()
                .throttled("/asa/secret", 1)
                .push("/asa/secret", Ok("super-secret-value")),
        );

        client.get("/asa/secret").await.unwrap();
        let rendered = serde_json::to_string(&log.records()).unwrap();
        assert!(!rendered.contains("super-secret-value"));
    }
}
