//! Secret store access
//!
//! [`SecretSource`] is a single round trip to a store; [`SecretClient`] layers
//! the throttling retry policy on top of any source.

mod client;
mod ssm;

use async_trait::async_trait;
use std::fmt;

pub use client::{RetryPolicy, SecretClient};
pub use ssm::SsmSource;

/// Why a single secret fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The store is rate limiting us; the request may be retried
    Throttled(String),
    /// Any other failure; never retried
    Failed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Throttled(msg) => write!(f, "throttled: {}", msg),
            FetchError::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

/// A store that can return the decrypted value of a named secret
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch and decrypt the secret at `path`
    async fn fetch(&self, path: &str) -> std::result::Result<String, FetchError>;
}
