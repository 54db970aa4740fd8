//! modelcontextprotocol.io registry fetch.
//!
//! Pages through `/v0/servers` with cursor pagination, retries 5xx with
//! exponential backoff, and keeps only the highest version per server.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use super::server::{OFFICIAL_META_KEY, ServerEntry, UpstreamSource};
use super::version::Version;
use crate::error::{McpOpsError, Result};

/// Page size requested from the registry
const PAGE_LIMIT: u32 = 100;

/// Maximum 5xx retries across a whole fetch
const MAX_RETRIES: u32 = 3;

/// Client for the public MCP registry
pub struct RegistryClient {
    client: Client,
    base_url: String,
}

impl RegistryClient {
    /// Create a registry client for the given servers endpoint
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Fetch all servers with pagination; keep only the highest version
    /// per server.
    pub async fn fetch_servers(&self) -> Result<Vec<ServerEntry>> {
        let mut entries = Vec::new();
        let mut cursor: Option<String> = None;
        let mut attempts = 0u32;

        loop {
            let mut request = self
                .client
                .get(&self.base_url)
                .query(&[("limit", PAGE_LIMIT.to_string())]);
            if let Some(c) = &cursor {
                request = request.query(&[("cursor", c.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();

            if status.is_server_error() && attempts < MAX_RETRIES {
                attempts += 1;
                let backoff = Duration::from_secs(2u64.pow(attempts));
                log::warn!("Registry returned {}, retrying in {:?}", status, backoff);
                tokio::time::sleep(backoff).await;
                continue;
            }
            if !status.is_success() {
                return Err(McpOpsError::Registry(format!(
                    "Registry fetch failed: HTTP {}",
                    status
                )));
            }

            let data: Value = response.json().await?;
            entries.extend(extract_page_entries(&data)?);

            cursor = next_cursor(&data);
            if cursor.is_none() {
                break;
            }
        }

        Ok(dedup_best_versions(entries))
    }
}

/// Pull the server records out of one page payload.
///
/// Each page item is `{server, _meta}`; the lifecycle status lives in the
/// envelope's official extension and is lifted onto the entry.
pub fn extract_page_entries(data: &Value) -> Result<Vec<ServerEntry>> {
    let items = data
        .get("servers")
        .or_else(|| data.get("items"))
        .or_else(|| data.get("data"))
        .and_then(|v| v.as_array())
        .or_else(|| data.as_array())
        .ok_or_else(|| {
            let keys = match data.as_object() {
                Some(map) => map.keys().cloned().collect::<Vec<_>>().join(", "),
                None => "non-object payload".to_string(),
            };
            McpOpsError::Registry(format!("Unexpected registry payload keys: [{}]", keys))
        })?;

    let mut entries = Vec::new();
    for item in items {
        let Some(server) = item.get("server") else {
            continue;
        };
        let mut entry: ServerEntry = match serde_json::from_value(server.clone()) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping malformed registry record: {}", e);
                continue;
            }
        };

        let status = item
            .get("_meta")
            .and_then(|m| m.get(OFFICIAL_META_KEY))
            .and_then(|m| m.get("status"))
            .and_then(Value::as_str)
            .unwrap_or("");
        entry.active = Some(status.to_lowercase());
        entry.upstream_source = UpstreamSource::ModelContextProtocol;
        entries.push(entry);
    }
    Ok(entries)
}

/// Cursor for the next page, under any of the shapes the registry has used
pub fn next_cursor(data: &Value) -> Option<String> {
    let metadata = data.get("metadata")?;
    metadata
        .get("nextCursor")
        .and_then(Value::as_str)
        .or_else(|| metadata.get("next_cursor").and_then(Value::as_str))
        .or_else(|| metadata.get("cursor").and_then(|c| c.get("next")).and_then(Value::as_str))
        .map(String::from)
}

/// Collapse entries sharing a server key, keeping the highest parsed
/// version. An unparseable version never displaces a parsed one.
pub fn dedup_best_versions(entries: Vec<ServerEntry>) -> Vec<ServerEntry> {
    let mut best: HashMap<String, (Option<Version>, ServerEntry)> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let key = entry.server_key().unwrap_or_else(|| format!("obj:{}", index));
        let version = entry.version.as_deref().and_then(Version::parse);

        match best.get_mut(&key) {
            None => {
                order.push(key.clone());
                best.insert(key, (version, entry));
            }
            Some((current_version, current_entry)) => {
                let newer = match (&version, &current_version) {
                    (Some(new), Some(old)) => new > old,
                    (Some(_), None) => true,
                    _ => false,
                };
                if newer {
                    *current_version = version;
                    *current_entry = entry;
                }
            }
        }
    }

    order.into_iter().filter_map(|key| best.remove(&key)).map(|(_, entry)| entry).collect()
}
