//! Server API operations

use log::debug;
use reqwest::StatusCode;

use crate::asa::{InventoryClient, Project};
use crate::config::api;
use crate::error::Result;

use super::models::Server;

/// Path of a project's server collection
fn servers_path(project: &Project) -> String {
    format!(
        "{}/{}/{}",
        api::PROJECTS,
        urlencoding::encode(&project.name),
        api::SERVERS
    )
}

impl InventoryClient<'_> {
    /// Get all servers enrolled in a project, in API order
    pub async fn get_servers(&self, project: &Project) -> Result<Vec<Server>> {
        let path = format!("{}?count={}", servers_path(project), api::SERVER_PAGE_SIZE);
        let servers: Vec<Server> = self.query(&path).await?;
        debug!(
            "Found {} servers in project '{}'",
            servers.len(),
            project.name
        );
        Ok(servers)
    }

    /// Remove a server from a project
    pub async fn delete_server(&self, project: &Project, server: &Server) -> Result<StatusCode> {
        let path = format!("{}/{}", servers_path(project), urlencoding::encode(&server.id));
        self.delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asa::{AsaClient, BearerToken};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_servers_path_encodes_project_name() {
        assert_eq!(servers_path(&Project::new("p2")), "projects/p2/servers");
        assert_eq!(
            servers_path(&Project::new("my project")),
            "projects/my%20project/servers"
        );
    }

    #[tokio::test]
    async fn test_get_servers_requests_large_pages() {
        let mock_server = MockServer::start().await;
        let client = AsaClient::test_client(&mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/v1/teams/my-team/projects/p1/servers"))
            .and(query_param("count", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [
                    {"id": "s1", "hostname": "bastion", "instance_details": null},
                    {"id": "s2", "hostname": "web-1", "instance_details": {"instance_id": "i-1"}}
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let servers = InventoryClient::new(&client, BearerToken::new("t"))
            .get_servers(&Project::new("p1"))
            .await
            .unwrap();

        assert_eq!(servers.len(), 2);
        assert!(servers[0].instance_details.is_none());
        assert!(servers[1].is_instance("i-1"));
    }

    #[tokio::test]
    async fn test_delete_server() {
        let mock_server = MockServer::start().await;
        let client = AsaClient::test_client(&mock_server.uri());

        Mock::given(method("DELETE"))
            .and(path("/v1/teams/my-team/projects/p2/servers/s9"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let server = Server {
            id: "s9".to_string(),
            hostname: "host-9".to_string(),
            instance_details: None,
        };
        let status = InventoryClient::new(&client, BearerToken::new("t"))
            .delete_server(&Project::new("p2"), &server)
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
