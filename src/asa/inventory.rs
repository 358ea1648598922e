//! Authenticated inventory queries with cursor pagination

use log::debug;
use reqwest::header::LINK;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::api;
use crate::error::{CleanerError, Result};

use super::link::parse_link_header;
use super::token::BearerToken;
use super::AsaClient;

/// Generic list response of the ASA API
#[derive(Deserialize, Debug)]
pub struct ListResponse<T> {
    pub list: Vec<T>,
}

/// Inventory reads and deletes for one bearer token
pub struct InventoryClient<'a> {
    client: &'a AsaClient,
    token: BearerToken,
}

impl<'a> InventoryClient<'a> {
    pub fn new(client: &'a AsaClient, token: BearerToken) -> Self {
        Self { client, token }
    }

    /// Fetch every page of a team scoped list endpoint
    ///
    /// Follows the first `Link` entry of each response until a response has
    /// no link header or its first entry is `rel="prev"`.
    ///
    /// # Arguments
    /// * `path` - path below the team, e.g. `projects` or `projects/p1/servers?count=1000`
    pub async fn query<T>(&self, path: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.query_with_limit(path, api::MAX_PAGES).await
    }

    pub(crate) async fn query_with_limit<T>(&self, path: &str, max_pages: usize) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut url = self.client.team_url(path);
        let mut items = Vec::new();

        for page in 1..=max_pages {
            debug!("Fetching page {} from: {}", page, url);

            let response = self.client.get(&url, &self.token).send().await?;
            self.client.record_ratelimit(&response);

            let link = match response.headers().get(LINK) {
                Some(value) => Some(
                    value
                        .to_str()
                        .map_err(|e| {
                            CleanerError::Config(format!(
                                "unreadable link header on {} (page {}): {}",
                                path, page, e
                            ))
                        })?
                        .to_string(),
                ),
                None => None,
            };

            let page_context = format!("{} (page {})", path, page);
            let body: ListResponse<T> = self
                .client
                .parse_api_response(response, &page_context)
                .await?;
            debug!("Page {} returned {} items", page, body.list.len());
            items.extend(body.list);

            let Some(link) = link else {
                return Ok(items);
            };
            let Some(first) = parse_link_header(&link).into_iter().next() else {
                debug!("Ignoring unparseable link header: {}", link);
                return Ok(items);
            };
            if first.is_prev() {
                return Ok(items);
            }

            url = self.client.resolve_link(&first.target)?;
        }

        Err(CleanerError::PaginationLimitExceeded {
            url,
            limit: max_pages,
        })
    }

    /// Delete a team scoped resource
    ///
    /// The status code is returned as-is; callers decide what it means.
    pub async fn delete(&self, path: &str) -> Result<StatusCode> {
        let url = self.client.team_url(path);
        debug!("Deleting: {}", url);

        let response = self.client.delete(&url, &self.token).send().await?;
        self.client.record_ratelimit(&response);

        let status = response.status();
        debug!("DELETE {} returned {}", url, status);
        Ok(status)
    }
}
