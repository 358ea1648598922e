//! ASA HTTP client for API interactions

use log::debug;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use std::sync::Mutex;

use crate::config::api;
use crate::error::{CleanerError, Result};

use super::token::BearerToken;

/// Remaining request quota reported by the most recent response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    remaining: Option<u64>,
}

impl RateLimitSnapshot {
    /// Read the snapshot from response headers (absent or garbled header = unknown)
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let remaining = headers
            .get(api::RATELIMIT_REMAINING_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());
        Self { remaining }
    }

    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }
}

/// ASA API client
///
/// Holds the connection pool, the team scope and the rate-limit snapshot of
/// the last response seen by any request made through it.
pub struct AsaClient {
    client: Client,
    host: String,
    team: String,
    /// Custom base URL override (for testing with mock servers)
    base_url_override: Option<String>,
    ratelimit: Mutex<RateLimitSnapshot>,
}

impl AsaClient {
    /// Create a new ASA client for the given host and team
    pub fn new(host: String, team: String) -> Self {
        let client = Client::builder()
            .connect_timeout(api::CONNECT_TIMEOUT)
            .timeout(api::REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            host,
            team,
            base_url_override: None,
            ratelimit: Mutex::new(RateLimitSnapshot::default()),
        }
    }

    /// Create a client with custom base URL (for testing with mock servers)
    #[cfg(test)]
    pub fn with_base_url(team: String, base_url: String) -> Self {
        let client = Client::builder().build().unwrap_or_else(|_| Client::new());

        Self {
            client,
            host: "mock.scaleft.com".to_string(),
            team,
            base_url_override: Some(base_url),
            ratelimit: Mutex::new(RateLimitSnapshot::default()),
        }
    }

    /// API root without trailing slash, e.g. `https://app.scaleft.com/v1`
    pub(crate) fn api_root(&self) -> String {
        let origin = match self.base_url_override {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host),
        };
        format!("{}{}", origin, api::BASE_PATH)
    }

    /// Full URL of a team scoped path, e.g. `projects` -> `.../v1/teams/<team>/projects`
    pub(crate) fn team_url(&self, path: &str) -> String {
        format!(
            "{}/teams/{}/{}",
            self.api_root(),
            self.team,
            path.trim_start_matches('/')
        )
    }

    /// Resolve a pagination link target against the API root
    ///
    /// Targets on another origin are rejected so the bearer token never leaves
    /// the API host.
    pub(crate) fn resolve_link(&self, target: &str) -> Result<String> {
        let invalid =
            |e: String| CleanerError::Config(format!("invalid link target '{}': {}", target, e));

        let base =
            Url::parse(&format!("{}/", self.api_root())).map_err(|e| invalid(e.to_string()))?;
        let url = base.join(target).map_err(|e| invalid(e.to_string()))?;
        if url.origin() != base.origin() {
            return Err(invalid(format!(
                "origin differs from {}",
                base.origin().ascii_serialization()
            )));
        }
        Ok(url.to_string())
    }

    /// Add standard headers to a request builder
    fn with_headers(
        &self,
        builder: reqwest::RequestBuilder,
        token: Option<&BearerToken>,
    ) -> reqwest::RequestBuilder {
        let builder = builder.header(CONTENT_TYPE, "application/json");
        match token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token.as_str())),
            None => builder,
        }
    }

    /// Create an unauthenticated POST request builder
    pub(crate) fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.with_headers(self.client.post(url), None)
    }

    /// Create an authenticated GET request builder
    pub(crate) fn get(&self, url: &str, token: &BearerToken) -> reqwest::RequestBuilder {
        self.with_headers(self.client.get(url), Some(token))
    }

    /// Create an authenticated DELETE request builder
    pub(crate) fn delete(&self, url: &str, token: &BearerToken) -> reqwest::RequestBuilder {
        self.with_headers(self.client.delete(url), Some(token))
    }

    /// Remember the rate-limit headers of a response
    pub(crate) fn record_ratelimit(&self, response: &Response) {
        let snapshot = RateLimitSnapshot::from_headers(response.headers());
        debug!("Rate limit remaining: {:?}", snapshot.remaining());
        if let Ok(mut last) = self.ratelimit.lock() {
            *last = snapshot;
        }
    }

    /// Rate-limit snapshot of the last response seen
    pub fn ratelimit(&self) -> RateLimitSnapshot {
        self.ratelimit
            .lock()
            .map(|last| *last)
            .unwrap_or_default()
    }

    /// Parse an API response, returning error for non-success status codes
    pub(crate) async fn parse_api_response<T>(
        &self,
        response: Response,
        error_context: &str,
    ) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if !response.status().is_success() {
            return Err(CleanerError::Api {
                status: response.status().as_u16(),
                message: format!("Failed to fetch {}", error_context),
            });
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
impl AsaClient {
    /// Create a test client for team `my-team` against a mock server
    pub fn test_client(base_url: &str) -> Self {
        Self::with_base_url("my-team".to_string(), base_url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_api_root() {
        let client = AsaClient::new("app.scaleft.com".to_string(), "acme".to_string());
        assert_eq!(client.api_root(), "https://app.scaleft.com/v1");
    }

    #[test]
    fn test_team_url() {
        let client = AsaClient::new("app.scaleft.com".to_string(), "acme".to_string());
        assert_eq!(
            client.team_url("projects"),
            "https://app.scaleft.com/v1/teams/acme/projects"
        );
        assert_eq!(
            client.team_url("/service_token"),
            "https://app.scaleft.com/v1/teams/acme/service_token"
        );
    }

    #[test]
    fn test_base_url_override() {
        let client = AsaClient::test_client("http://127.0.0.1:4321/");
        assert_eq!(client.api_root(), "http://127.0.0.1:4321/v1");
        assert_eq!(
            client.team_url("projects"),
            "http://127.0.0.1:4321/v1/teams/my-team/projects"
        );
    }

    #[test]
    fn test_resolve_relative_link() {
        let client = AsaClient::new("app.scaleft.com".to_string(), "acme".to_string());
        let url = client
            .resolve_link("teams/acme/projects?offset=abc")
            .unwrap();
        assert_eq!(url, "https://app.scaleft.com/v1/teams/acme/projects?offset=abc");
    }

    #[test]
    fn test_resolve_absolute_link() {
        let client = AsaClient::new("app.scaleft.com".to_string(), "acme".to_string());
        let url = client
            .resolve_link("https://app.scaleft.com/v1/teams/acme/projects?offset=abc")
            .unwrap();
        assert_eq!(url, "https://app.scaleft.com/v1/teams/acme/projects?offset=abc");
    }

    #[test]
    fn test_resolve_link_rejects_foreign_origin() {
        let client = AsaClient::new("app.scaleft.com".to_string(), "acme".to_string());

        for target in [
            "https://evil.example.com/v1/teams/acme/projects?offset=abc",
            "http://app.scaleft.com/v1/teams/acme/projects",
            "//evil.example.com/v1/teams/acme/projects",
        ] {
            match client.resolve_link(target).unwrap_err() {
                CleanerError::Config(msg) => assert!(msg.contains(target)),
                other => panic!("Expected CleanerError::Config, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_ratelimit_snapshot_from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(RateLimitSnapshot::from_headers(&headers).remaining(), None);

        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("97"));
        assert_eq!(RateLimitSnapshot::from_headers(&headers).remaining(), Some(97));

        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("lots"));
        assert_eq!(RateLimitSnapshot::from_headers(&headers).remaining(), None);
    }

    #[test]
    fn test_ratelimit_starts_unknown() {
        let client = AsaClient::test_client("http://localhost");
        assert_eq!(client.ratelimit(), RateLimitSnapshot::default());
    }
}
