//! Authenticated GitHub HTTP client.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde_json::Value;

use crate::error::{McpOpsError, Result};

/// REST API base
pub(super) const GITHUB_API_URL: &str = "https://api.github.com";

/// GraphQL endpoint
pub(super) const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = "mcp-catalog-selector/1.1";
const ACCEPT_GITHUB: &str = "application/vnd.github+json";

/// GitHub API client carrying the sync workflow PAT
pub struct GithubClient {
    pub(super) client: Client,
    token: String,
}

impl GithubClient {
    /// Create a client reading the token from the given environment variable
    pub fn new(token_env: &str) -> Result<Self> {
        let token = std::env::var(token_env)
            .map_err(|_| McpOpsError::Github(format!("{} not set", token_env)))?;
        Self::with_token(token)
    }

    /// Create a client with an explicit token
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        let token = token.into();

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| McpOpsError::Github(format!("Invalid token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, token })
    }

    /// Whether the client has a usable token
    pub fn is_ready(&self) -> bool {
        !self.token.is_empty()
    }

    /// GET a JSON document, surfacing rate limits explicitly
    pub(super) async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        Self::json_or_error(url, response).await
    }

    /// POST a JSON body, returning the JSON response
    pub(super) async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self.client.post(url).json(body).send().await?;
        Self::json_or_error(url, response).await
    }

    async fn json_or_error(url: &str, response: Response) -> Result<Value> {
        let status = response.status();

        if status.as_u16() == 429 {
            let reset = response
                .headers()
                .get("x-ratelimit-reset")
                .and_then(|h| h.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            return Err(McpOpsError::Github(format!(
                "API rate-limited, try later (reset={})",
                reset
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(McpOpsError::Github(format!("{} failed: HTTP {} - {}", url, status, body)));
        }

        Ok(response.json().await?)
    }
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient").field("ready", &self.is_ready()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_token() {
        let client = GithubClient::with_token("ghp_test").unwrap();
        assert!(client.is_ready());
    }

    #[test]
    fn test_empty_token_not_ready() {
        let client = GithubClient::with_token("").unwrap();
        assert!(!client.is_ready());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = GithubClient::with_token("bad\ntoken");
        assert!(matches!(result, Err(McpOpsError::Github(_))));
    }

    #[test]
    fn test_debug_impl_hides_token() {
        let client = GithubClient::with_token("ghp_secret").unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("ghp_secret"));
    }
}
