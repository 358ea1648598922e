//! Server data models

use serde::Deserialize;

/// Server enrolled in an ASA project
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Server {
    pub id: String,
    #[serde(default)]
    pub hostname: String,
    /// Cloud metadata; absent for servers not enrolled from a cloud instance
    #[serde(default)]
    pub instance_details: Option<InstanceDetails>,
}

/// Cloud instance metadata attached to a server
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstanceDetails {
    #[serde(default)]
    pub instance_id: Option<String>,
}

impl Server {
    /// Cloud instance id, if the server has one
    pub fn instance_id(&self) -> Option<&str> {
        self.instance_details
            .as_ref()
            .and_then(|details| details.instance_id.as_deref())
    }

    /// Check if this server is the given cloud instance
    pub fn is_instance(&self, instance_id: &str) -> bool {
        self.instance_id() == Some(instance_id)
    }
}
