//! Selected-server state persisted between sync runs.
//!
//! A flat JSON map of server name to the record of when and why it was
//! surfaced. The file is read once at startup and rewritten wholesale at
//! the end of the run via temp-file rename.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::registry::ServerEntry;

/// One previously surfaced server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedServer {
    pub name: String,
    pub description: String,
    pub version: String,
    pub repository_url: String,
    pub server_type: String,
    pub upstream_source: String,
    pub issue_url: String,
    pub processed_at: String,
}

/// The selected-servers state file
#[derive(Debug, Default)]
pub struct SelectedServers {
    servers: BTreeMap<String, SelectedServer>,
}

impl SelectedServers {
    /// Load the state file; a missing or unreadable file starts fresh
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No selected servers file found, starting fresh");
            return Self::default();
        }

        match fs::read_to_string(path).map_err(|e| e.to_string()).and_then(|content| {
            serde_json::from_str::<BTreeMap<String, SelectedServer>>(&content).map_err(|e| e.to_string())
        }) {
            Ok(servers) => {
                log::info!("Loaded {} previously processed servers", servers.len());
                Self { servers }
            }
            Err(e) => {
                log::warn!("Could not load selected servers file: {}", e);
                Self::default()
            }
        }
    }

    /// Rewrite the whole state file atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        atomic_write_json(path, &self.servers)?;
        log::info!("Saved {} selected servers", self.servers.len());
        Ok(())
    }

    /// Whether a server name was already processed
    pub fn contains(&self, name: &str) -> bool {
        self.servers.contains_key(name)
    }

    /// Record a newly surfaced server with its tracking issue
    pub fn record(&mut self, server: &ServerEntry, issue_url: &str) {
        if server.name.is_empty() {
            return;
        }
        self.servers.insert(
            server.name.clone(),
            SelectedServer {
                name: server.name.clone(),
                description: server.description.clone().unwrap_or_default(),
                version: server.version.clone().unwrap_or_default(),
                repository_url: server.repo_url().unwrap_or_default().to_string(),
                server_type: server.kind.map(|k| k.to_string()).unwrap_or_default(),
                upstream_source: server.upstream_source.to_string(),
                issue_url: issue_url.to_string(),
                processed_at: super::utc_stamp(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

/// Whole-file atomic JSON write: temp file in the same directory, then
/// rename over the target.
pub(crate) fn atomic_write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
