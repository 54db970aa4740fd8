//! Ownership decision cache.
//!
//! Judge calls cost money and registries churn slowly, so decisions are
//! cached across runs keyed by `name:normalized_repo_url`. The file is a
//! flat JSON map rewritten wholesale when new judgments land.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::state::atomic_write_json;
use crate::error::Result;
use crate::normalize::normalize_url;
use crate::registry::ServerEntry;

/// One cached judge verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDecision {
    pub ai_decision: String,
    pub ai_confidence: f64,
    pub ai_reason: String,
    pub cached_at: String,
    pub repository_url: String,
    pub server_name: String,
}

/// The decision cache file
#[derive(Debug, Default)]
pub struct DecisionCache {
    entries: BTreeMap<String, CachedDecision>,
    dirty: bool,
}

impl DecisionCache {
    /// Load the cache file; a missing or unreadable file starts fresh
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No ownership decision cache found, starting fresh");
            return Self::default();
        }

        match fs::read_to_string(path).map_err(|e| e.to_string()).and_then(|content| {
            serde_json::from_str::<BTreeMap<String, CachedDecision>>(&content).map_err(|e| e.to_string())
        }) {
            Ok(entries) => {
                log::info!("Loaded ownership decision cache with {} entries", entries.len());
                Self { entries, dirty: false }
            }
            Err(e) => {
                log::warn!("Could not load ownership decision cache: {}", e);
                Self::default()
            }
        }
    }

    /// Rewrite the cache file if any new judgments landed this run
    pub fn save_if_dirty(&self, path: &Path) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        atomic_write_json(path, &self.entries)?;
        log::info!("Saved ownership decision cache with {} entries", self.entries.len());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&CachedDecision> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, decision: CachedDecision) {
        self.entries.insert(key, decision);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stable cache key for a server: `name:normalized_repo_url` when a
/// repository is known, otherwise the bare name.
pub fn cache_key(server: &ServerEntry) -> String {
    match server.repo_url() {
        Some(url) => {
            let normalized = normalize_url(url).unwrap_or_else(|| url.to_string());
            format!("{}:{}", server.name, normalized)
        }
        None if server.name.is_empty() => "unknown".to_string(),
        None => server.name.clone(),
    }
}
