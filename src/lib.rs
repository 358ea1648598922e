//! asa-cleaner - Remove terminated EC2 instances from ScaleFT / ASA
//!
//! Triggered once per instance termination. Finds the server record bound to
//! the instance in any project of an ASA team and deletes it.
//!
//! # Features
//!
//! - API credentials read from SSM Parameter Store, with throttling retry
//! - Cursor (`Link` header) pagination over projects and servers
//! - First match wins; a missing record is a normal outcome
//! - One JSON log record per outcome
//!
//! # Example
//!
//! ```bash
//! export ASA_TEAM=acme
//! export ASA_API_KEY_PATH=/asa/api-key
//! export ASA_API_SECRET_PATH=/asa/api-secret
//!
//! # Clean up a single instance
//! asa-cleaner --instance-id i-0123456789abcdef0
//!
//! # Clean up from an EventBridge event
//! asa-cleaner --event event.json
//! ```

pub mod asa;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod secrets;

pub use asa::{
    AsaClient, BearerToken, CredentialPaths, InventoryClient, Project, RateLimitSnapshot, Server,
    TokenProvider,
};
pub use cleaner::{search, Cleaner, CleanupOutcome, CleanupReport, SearchOutcome};
pub use cli::{Cli, Trigger};
pub use error::{CleanerError, Result};
pub use event::TerminationEvent;
pub use logging::{EventLogger, LogEvent, EVENT_TARGET};
pub use secrets::{RetryPolicy, SecretClient, SecretSource, SsmSource};
