//! Scrape of the GitHub MCP registry page.
//!
//! github.com/mcp has no API; the server list ships as a JSON payload
//! embedded in the page HTML. Records are reshaped to match the registry
//! entry model (`repository.url` from `url`, always active).

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde_json::Value;

use super::server::{Repository, ServerEntry, UpstreamSource};
use crate::error::{McpOpsError, Result};

/// The react-app payload script GitHub renders the registry into
static EMBEDDED_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<script[^>]*type="application/json"[^>]*data-target="react-app\.embeddedData"[^>]*>(.*?)</script>"#,
    )
    .expect("embedded-data pattern")
});

/// Any JSON script tag, for the fallback scan
static JSON_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script[^>]*type="application/json"[^>]*>(.*?)</script>"#).expect("json-script pattern")
});

/// Scraper for the GitHub MCP registry page
pub struct GithubRegistryScraper {
    client: Client,
    url: String,
}

impl GithubRegistryScraper {
    /// Create a scraper for the given page URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the page and extract its server records
    pub async fn fetch_servers(&self) -> Result<Vec<ServerEntry>> {
        let response = self
            .client
            .get(&self.url)
            .header("User-Agent", "curl/8.5 (compatible; mcp-scraper)")
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.7")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(McpOpsError::Registry(format!(
                "GitHub registry page fetch failed: HTTP {}",
                status
            )));
        }

        let html = response.text().await?;
        let payload = extract_embedded_json(&html)?;
        parse_servers(&payload)
    }
}

/// Find the embedded JSON payload inside the page HTML
pub fn extract_embedded_json(html: &str) -> Result<String> {
    if let Some(captures) = EMBEDDED_DATA.captures(html) {
        return Ok(captures[1].to_string());
    }

    // Fallback: scan any JSON script for the route we need
    for captures in JSON_SCRIPT.captures_iter(html) {
        if captures[1].contains("mcpRegistryRoute") {
            return Ok(captures[1].to_string());
        }
    }

    Err(McpOpsError::Registry("Embedded JSON payload not found".to_string()))
}

/// Parse the embedded payload into server entries
pub fn parse_servers(payload: &str) -> Result<Vec<ServerEntry>> {
    // GitHub sometimes HTML-escapes the payload; retry after unescaping
    let data: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(_) => serde_json::from_str(&html_unescape(payload))
            .map_err(|e| McpOpsError::Registry(format!("Embedded JSON did not parse: {}", e)))?,
    };

    let servers = data
        .pointer("/payload/mcpRegistryRoute/serversData/servers")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            McpOpsError::Registry("Embedded payload missing serversData.servers".to_string())
        })?;

    Ok(servers.iter().map(reshape_server).collect())
}

/// Reshape one page record into the registry entry model
fn reshape_server(item: &Value) -> ServerEntry {
    ServerEntry {
        name: item["name"].as_str().unwrap_or_default().to_string(),
        description: item["description"].as_str().map(String::from),
        version: item["version"].as_str().map(String::from),
        repository: item["url"].as_str().map(|url| Repository {
            url: url.to_string(),
            source: None,
        }),
        display_name: item["display_name"]
            .as_str()
            .or_else(|| item["displayName"].as_str())
            .map(String::from),
        active: Some("active".to_string()),
        upstream_source: UpstreamSource::GithubMcp,
        ..Default::default()
    }
}

/// Minimal HTML entity unescape, enough for JSON payloads
fn html_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head></head><body>
<script type="application/json" data-target="react-app.embeddedData">{"payload":{"mcpRegistryRoute":{"serversData":{"servers":[{"name":"acme-widget","description":"Widget things","url":"https://github.com/acme/widget"}]}}}}</script>
</body></html>"#;

    #[test]
    fn test_extract_embedded_json_primary() {
        let payload = extract_embedded_json(PAGE).unwrap();
        assert!(payload.contains("mcpRegistryRoute"));
    }

    #[test]
    fn test_extract_embedded_json_fallback() {
        let page = r#"<script type="application/json" data-x="1">{"payload":{"mcpRegistryRoute":{}}}</script>"#;
        let payload = extract_embedded_json(page).unwrap();
        assert!(payload.contains("mcpRegistryRoute"));
    }

    #[test]
    fn test_extract_embedded_json_missing() {
        let result = extract_embedded_json("<html><body>nothing here</body></html>");
        assert!(matches!(result, Err(McpOpsError::Registry(_))));
    }

    #[test]
    fn test_parse_servers() {
        let payload = extract_embedded_json(PAGE).unwrap();
        let servers = parse_servers(&payload).unwrap();
        assert_eq!(servers.len(), 1);

        let server = &servers[0];
        assert_eq!(server.name, "acme-widget");
        assert_eq!(server.repo_url(), Some("https://github.com/acme/widget"));
        assert!(server.is_active());
        assert_eq!(server.upstream_source, UpstreamSource::GithubMcp);
    }

    #[test]
    fn test_parse_servers_html_escaped() {
        let payload = r#"{&quot;payload&quot;:{&quot;mcpRegistryRoute&quot;:{&quot;serversData&quot;:{&quot;servers&quot;:[]}}}}"#;
        let servers = parse_servers(payload).unwrap();
        assert!(servers.is_empty());
    }

    #[test]
    fn test_parse_servers_missing_route() {
        let result = parse_servers(r#"{"payload":{}}"#);
        assert!(matches!(result, Err(McpOpsError::Registry(_))));
    }

    #[test]
    fn test_html_unescape_order() {
        // &amp; must be handled last so double-escapes stay intact
        assert_eq!(html_unescape("&amp;lt;"), "&lt;");
        assert_eq!(html_unescape("&quot;a&quot;"), "\"a\"");
    }
}
