//! Server module

mod api;
mod models;

pub use models::{InstanceDetails, Server};
