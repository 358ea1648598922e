//! Project API operations

use log::debug;

use crate::asa::InventoryClient;
use crate::config::api;
use crate::error::Result;

use super::models::Project;

impl InventoryClient<'_> {
    /// Get all projects of the team, in API order
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        let projects: Vec<Project> = self.query(api::PROJECTS).await?;
        debug!("Found {} projects", projects.len());
        Ok(projects)
    }
}
