//! ASA API client module
//!
//! This module provides functionality to interact with the ScaleFT / Advanced
//! Server Access API: token exchange, paginated inventory reads and deletes.

mod client;
mod inventory;
pub mod link;
pub mod projects;
pub mod servers;
mod token;

pub use client::{AsaClient, RateLimitSnapshot};
pub use inventory::{InventoryClient, ListResponse};
pub use link::{parse_link_header, LinkEntry};
pub use projects::Project;
pub use servers::{InstanceDetails, Server};
pub use token::{BearerToken, CredentialPaths, TokenProvider};
