//! End-to-end registry sync workflow.
//!
//! Fetch both upstreams, dedupe against the catalog and prior runs,
//! judge ownership, open tracking issues for the survivors, and persist
//! the updated state.

use colored::*;

use super::cache::DecisionCache;
use super::filter::{FilterContext, check_display_name_overlaps, filter_servers};
use super::issues::{issue_body, issue_title};
use super::state::SelectedServers;
use crate::catalog::load_catalog;
use crate::config::Config;
use crate::error::{McpOpsError, Result};
use crate::github::GithubClient;
use crate::llm::LlmClient;
use crate::registry::{GithubRegistryScraper, RegistryClient, ServerKind};

/// Run the full sync workflow. With `dry_run` set, nothing is created
/// on GitHub and the selected-server state is left untouched.
pub async fn run(config: &Config, github: &GithubClient, llm: &dyn LlmClient, dry_run: bool) -> Result<()> {
    println!("{}", "=== MCP Server Catalog Selection Workflow ===".bold());
    let owner = &config.github.catalog_owner;
    let repo = &config.github.catalog_repo;

    // Project and index-issue handles; a missing project is fatal, a
    // missing index issue only disables sub-issue linking
    let project_id = if dry_run {
        None
    } else {
        match github.project_id(owner, config.sync.project_number).await? {
            Some(id) => {
                println!("{} Found project ID: {}", "ok:".green(), id);
                Some(id)
            }
            None => {
                return Err(McpOpsError::Github(format!(
                    "Could not resolve project {} for {}",
                    config.sync.project_number, owner
                )));
            }
        }
    };

    let parent_node_id = if dry_run {
        None
    } else {
        log::info!("Fetching node ID for index issue #{}", config.sync.index_issue);
        match github.issue_node_id(owner, repo, config.sync.index_issue).await {
            Ok(node_id) if !node_id.is_empty() => Some(node_id),
            Ok(_) | Err(_) => {
                println!(
                    "{} Could not get node ID for index issue #{}; sub-issues will not be linked",
                    "warning:".yellow(),
                    config.sync.index_issue
                );
                None
            }
        }
    };

    // Step 1: fetch both upstreams
    println!("Fetching servers from MCP registry...");
    let registry = RegistryClient::new(&config.sync.registry_url)?;
    let registry_servers = registry.fetch_servers().await?;

    let scraper = GithubRegistryScraper::new(&config.sync.github_registry_url)?;
    let page_servers = scraper.fetch_servers().await?;

    println!(
        "Found {} servers from the MCP registry and {} from the GitHub registry page",
        registry_servers.len(),
        page_servers.len()
    );
    let servers: Vec<_> = registry_servers.into_iter().chain(page_servers).collect();

    // Step 2: existing catalog entries
    println!("\nLoading existing catalog entries...");
    let catalog = load_catalog(github, owner, repo).await?;
    println!("Found {} existing catalog entries", catalog.len());

    // Step 3: prior state and decision cache
    let mut state = SelectedServers::load(&config.sync.state_file);
    println!("Found {} previously processed servers", state.len());
    let mut cache = DecisionCache::load(&config.sync.ai_cache_file);

    // Step 4: filter and classify
    println!("\nFiltering and classifying servers...");
    let ctx = FilterContext {
        catalog: &catalog,
        state: &state,
        star_min: config.sync.star_min,
        recent_days: config.sync.recent_days,
        judge_model: &config.llm.judge_model,
    };
    let outcome = filter_servers(servers, &ctx, github, llm, &mut cache).await?;

    println!("\nFiltered down to {} servers:", outcome.selected.len());
    println!("  - Official: {}", outcome.count_of(ServerKind::Official));
    println!("  - Community: {}", outcome.count_of(ServerKind::Community));
    println!("\nDecision cache: {} hits, {} misses, {} total entries", outcome.cache_hits, outcome.cache_misses, cache.len());

    // Step 5: display-name overlap check
    println!("\nChecking for display name overlaps with the catalog...");
    let non_active = outcome.non_active.len();
    let likely_remote = outcome.likely_remote.len();
    let overlap = check_display_name_overlaps(outcome.selected, &catalog);
    println!("  Servers with a display name: {}", overlap.with_display_name);
    println!("  Overlapping with catalog: {}", overlap.overlapping.len());
    println!("  Non-overlapping: {}", overlap.retained.len());
    for held in &overlap.overlapping {
        println!(
            "    {} {} matches catalog entry {}",
            "held:".yellow(),
            held.display_name,
            held.catalog_match
        );
    }

    // Step 6: open tracking issues
    println!("\nProcessing {} servers...", overlap.retained.len());
    let mut issues_created = 0usize;
    for server in overlap.retained {
        let title = issue_title(&server);
        println!("-> {}", title);

        if dry_run {
            println!("   {} would create issue and record state", "dry-run:".cyan());
            continue;
        }

        let issue = github.create_issue(owner, repo, &title, &issue_body(&server, owner, repo), &config.sync.issue_labels).await?;
        println!("   {} Created issue #{}: {}", "ok:".green(), issue.number, issue.html_url);

        if let Some(project) = &project_id {
            if !issue.node_id.is_empty() {
                match github.add_issue_to_project(project, &issue.node_id).await {
                    Ok(true) => println!("   {} Added issue #{} to project", "ok:".green(), issue.number),
                    Ok(false) => println!("   {} Could not add issue #{} to project", "warning:".yellow(), issue.number),
                    Err(e) => log::warn!("Project linking failed for #{}: {}", issue.number, e),
                }
            }
        }

        if let Some(parent) = &parent_node_id {
            if !issue.node_id.is_empty() {
                match github.add_sub_issue(parent, &issue.node_id).await {
                    Ok(true) => println!("   {} Added as sub-issue of #{}", "ok:".green(), config.sync.index_issue),
                    Ok(false) => println!("   {} Could not link sub-issue for #{}", "warning:".yellow(), issue.number),
                    Err(e) => log::warn!("Sub-issue linking failed for #{}: {}", issue.number, e),
                }
            }
        }

        state.record(&server, &issue.html_url);
        issues_created += 1;
    }

    // Step 7: persist state; judgments are cached even on a dry run
    if !dry_run {
        state.save(&config.sync.state_file)?;
    }
    cache.save_if_dirty(&config.sync.ai_cache_file)?;

    // Step 8: summary
    println!("\n{}", "=== Summary ===".bold());
    println!("New issues created: {}", issues_created);
    println!("Total tracked servers: {}", state.len());
    println!("Display name overlaps detected: {}", overlap.overlapping.len());
    println!("Non-active servers: {}", non_active);
    println!("Remote servers: {}", likely_remote);

    Ok(())
}
