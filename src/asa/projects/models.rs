//! Project data models

use serde::Deserialize;

/// Project data from ASA API
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
