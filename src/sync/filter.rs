//! Server filtering and classification pipeline.
//!
//! Order matters and mirrors how cheap each check is: lifecycle status,
//! then state/catalog dedup (pure string work), then the GitHub metadata
//! fetch, and only last the model judgment - cached across runs.

use std::collections::{HashMap, HashSet};

use super::cache::{CachedDecision, DecisionCache, cache_key};
use super::classify::{Ownership, OwnershipDecision, is_popular_community, judge_ownership};
use crate::catalog::CatalogEntry;
use crate::error::Result;
use crate::github::GithubClient;
use crate::llm::LlmClient;
use crate::normalize::{norm, normalize_url, parse_repo_url};
use crate::registry::{ServerEntry, ServerKind};
use crate::sync::state::SelectedServers;

/// Knobs for one filtering pass
pub struct FilterContext<'a> {
    pub catalog: &'a [CatalogEntry],
    pub state: &'a SelectedServers,
    pub star_min: u64,
    pub recent_days: i64,
    pub judge_model: &'a str,
}

/// What came out of the filtering pass
#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub selected: Vec<ServerEntry>,
    pub non_active: Vec<ServerEntry>,
    pub likely_remote: Vec<ServerEntry>,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

impl FilterOutcome {
    /// Selected servers of the given kind
    pub fn count_of(&self, kind: ServerKind) -> usize {
        self.selected.iter().filter(|s| s.kind == Some(kind)).count()
    }
}

/// Filter and classify upstream servers against the catalog and state.
pub async fn filter_servers(
    servers: Vec<ServerEntry>,
    ctx: &FilterContext<'_>,
    github: &GithubClient,
    llm: &dyn LlmClient,
    cache: &mut DecisionCache,
) -> Result<FilterOutcome> {
    let catalog_urls: HashSet<String> = ctx
        .catalog
        .iter()
        .filter_map(|entry| entry.repo_url.as_deref())
        .filter_map(normalize_url)
        .collect();
    // One long lowercase string; a bare substring hit on the final name
    // segment is enough to call it a duplicate
    let catalog_names = ctx
        .catalog
        .iter()
        .map(|entry| entry.name.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut outcome = FilterOutcome::default();
    log::info!("Starting filtering with {} servers", servers.len());

    for mut server in servers {
        if !server.is_active() {
            outcome.non_active.push(server);
            continue;
        }

        if ctx.state.contains(&server.name) {
            log::debug!("Skipping {}: already in the state index", server.name);
            continue;
        }

        let short_name = server.name.rsplit('/').next().unwrap_or("").to_lowercase();
        if short_name != "mcp" && catalog_names.contains(&short_name) {
            log::debug!("Skipping {}: name duplicate of a catalog entry", server.name);
            continue;
        }

        let url = server.repo_url().unwrap_or_default().to_string();
        if let Some(normalized) = normalize_url(&url) {
            if catalog_urls.contains(&normalized) {
                log::debug!("Skipping {}: URL duplicate of a catalog entry", server.name);
                continue;
            }
        }

        let Some((owner, repo)) = parse_repo_url(&url) else {
            if !server.remotes.is_empty() {
                server.kind = Some(ServerKind::Remote);
                outcome.likely_remote.push(server);
            }
            continue;
        };

        let meta = match github.repo_info(&owner, &repo).await {
            Ok(meta) => meta,
            Err(e) => {
                log::warn!("Error fetching repo info for {}/{}: {}", owner, repo, e);
                continue;
            }
        };

        let key = cache_key(&server);
        let decision = match cache.get(&key) {
            Some(cached) => {
                outcome.cache_hits += 1;
                OwnershipDecision {
                    decision: Ownership::parse(&cached.ai_decision),
                    confidence: cached.ai_confidence,
                    reason: cached.ai_reason.clone(),
                }
            }
            None => {
                let judged = judge_ownership(llm, ctx.judge_model, &server).await?;
                cache.insert(
                    key,
                    CachedDecision {
                        ai_decision: judged.decision.to_string(),
                        ai_confidence: judged.confidence,
                        ai_reason: judged.reason.clone(),
                        cached_at: super::utc_stamp(),
                        repository_url: url.clone(),
                        server_name: server.name.clone(),
                    },
                );
                outcome.cache_misses += 1;
                judged
            }
        };

        match decision.decision {
            Ownership::Official => {
                server.kind = Some(ServerKind::Official);
                outcome.selected.push(server);
            }
            Ownership::Community => {
                if is_popular_community(&meta, ctx.star_min, ctx.recent_days) {
                    server.kind = Some(ServerKind::Community);
                    outcome.selected.push(server);
                } else {
                    log::debug!("Dropping {}: community server below the popularity bar", server.name);
                }
            }
            Ownership::Uncertain => {
                log::debug!("Dropping {}: ownership uncertain ({})", server.name, decision.reason);
            }
        }
    }

    Ok(outcome)
}

/// A held-back server whose display name collides with the catalog
#[derive(Debug, Clone)]
pub struct DisplayNameOverlap {
    pub display_name: String,
    pub catalog_match: String,
    pub server_name: String,
    pub repository: String,
}

/// Outcome of the display-name overlap check
#[derive(Debug, Default)]
pub struct OverlapOutcome {
    pub overlapping: Vec<DisplayNameOverlap>,
    pub retained: Vec<ServerEntry>,
    pub with_display_name: usize,
}

/// Hold back servers whose display name normalizes to an existing
/// catalog name. Servers without a display name always pass.
pub fn check_display_name_overlaps(servers: Vec<ServerEntry>, catalog: &[CatalogEntry]) -> OverlapOutcome {
    let mut canonical: HashMap<String, String> = HashMap::new();
    for entry in catalog {
        if !entry.name.is_empty() {
            canonical.insert(norm(&entry.name), entry.name.clone());
        }
    }

    let mut outcome = OverlapOutcome::default();
    for server in servers {
        let Some(display_name) = server.display_name.clone().filter(|s| !s.is_empty()) else {
            outcome.retained.push(server);
            continue;
        };
        outcome.with_display_name += 1;

        match canonical.get(&norm(&display_name)) {
            Some(catalog_match) => outcome.overlapping.push(DisplayNameOverlap {
                display_name,
                catalog_match: catalog_match.clone(),
                server_name: server.name.clone(),
                repository: server.repo_url().unwrap_or_default().to_string(),
            }),
            None => outcome.retained.push(server),
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_entry(name: &str, repo_url: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            repo_url: repo_url.map(String::from),
            runtime: None,
            short_desc: String::new(),
            remote_config: None,
        }
    }

    fn server(name: &str, display_name: Option<&str>) -> ServerEntry {
        ServerEntry {
            name: name.to_string(),
            display_name: display_name.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_overlap_holds_back_matching_display_names() {
        let catalog = vec![catalog_entry("Notion", None)];
        let servers = vec![
            server("a/notion-mcp", Some("Notion HQ")),
            server("b/widget", Some("Widget")),
            server("c/nameless", None),
        ];

        let outcome = check_display_name_overlaps(servers, &catalog);

        assert_eq!(outcome.with_display_name, 2);
        assert_eq!(outcome.overlapping.len(), 1);
        assert_eq!(outcome.overlapping[0].catalog_match, "Notion");
        assert_eq!(outcome.overlapping[0].server_name, "a/notion-mcp");
        assert_eq!(outcome.retained.len(), 2);
    }

    #[test]
    fn test_overlap_empty_display_name_passes() {
        let catalog = vec![catalog_entry("Notion", None)];
        let outcome = check_display_name_overlaps(vec![server("a/x", Some(""))], &catalog);
        assert_eq!(outcome.with_display_name, 0);
        assert_eq!(outcome.retained.len(), 1);
    }

    #[test]
    fn test_overlap_no_catalog() {
        let outcome = check_display_name_overlaps(vec![server("a/x", Some("Widget"))], &[]);
        assert!(outcome.overlapping.is_empty());
        assert_eq!(outcome.retained.len(), 1);
    }

    #[test]
    fn test_count_of() {
        let mut outcome = FilterOutcome::default();
        let mut official = server("a", None);
        official.kind = Some(ServerKind::Official);
        let mut community = server("b", None);
        community.kind = Some(ServerKind::Community);
        outcome.selected = vec![official, community];

        assert_eq!(outcome.count_of(ServerKind::Official), 1);
        assert_eq!(outcome.count_of(ServerKind::Community), 1);
        assert_eq!(outcome.count_of(ServerKind::Remote), 0);
    }
}
