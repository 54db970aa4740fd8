//! Curated catalog access.
//!
//! The catalog is a set of root-level YAML manifests in the catalog
//! repository. Only the fields that matter for dedup are kept; long
//! descriptions are cut at the "## Features" marker.

use serde_yaml::Value;

use crate::error::Result;
use crate::github::GithubClient;

/// Marker after which catalog descriptions stop being a summary
const FEATURES_MARKER: &str = "## Features";

/// One curated catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub name: String,
    pub repo_url: Option<String>,
    pub runtime: Option<String>,
    pub short_desc: String,
    pub remote_config: Option<Value>,
}

/// Load every root-level YAML manifest from the catalog repository.
/// Files that fail to fetch or parse are skipped, not fatal.
pub async fn load_catalog(github: &GithubClient, owner: &str, repo: &str) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();

    for path in github.list_root_yaml_paths(owner, repo).await? {
        let text = match github.read_file_text(owner, repo, &path).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Skipping catalog file {}: {}", path, e);
                continue;
            }
        };
        let doc: Value = match serde_yaml::from_str(&text) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Skipping unparseable catalog file {}: {}", path, e);
                continue;
            }
        };
        entries.extend(parse_catalog_doc(&doc));
    }

    Ok(entries)
}

/// Parse one catalog document (a mapping, or a list of mappings)
pub fn parse_catalog_doc(doc: &Value) -> Vec<CatalogEntry> {
    let docs: Vec<&Value> = match doc {
        Value::Sequence(items) => items.iter().collect(),
        other => vec![other],
    };
    docs.into_iter().filter_map(parse_catalog_entry).collect()
}

fn parse_catalog_entry(doc: &Value) -> Option<CatalogEntry> {
    let name = doc.get("name")?.as_str()?.to_string();

    let description = doc.get("description").and_then(Value::as_str).unwrap_or("");
    let short_desc = description
        .split(FEATURES_MARKER)
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    let runtime = doc.get("runtime").and_then(Value::as_str).map(String::from);
    let remote_config = if runtime.as_deref() == Some("remote") {
        doc.get("remoteConfig").cloned()
    } else {
        None
    };

    Some(CatalogEntry {
        name,
        repo_url: doc.get("repoURL").and_then(Value::as_str).map(String::from),
        runtime,
        short_desc,
        remote_config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Vec<CatalogEntry> {
        let doc: Value = serde_yaml::from_str(yaml).unwrap();
        parse_catalog_doc(&doc)
    }

    #[test]
    fn test_parse_single_entry() {
        let entries = parse(
            "name: widget\nrepoURL: https://github.com/acme/widget\nruntime: npx\ndescription: A widget server\n",
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "widget");
        assert_eq!(entries[0].repo_url.as_deref(), Some("https://github.com/acme/widget"));
        assert_eq!(entries[0].runtime.as_deref(), Some("npx"));
        assert_eq!(entries[0].short_desc, "A widget server");
        assert!(entries[0].remote_config.is_none());
    }

    #[test]
    fn test_parse_list_document() {
        let entries = parse("- name: one\n- name: two\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "two");
    }

    #[test]
    fn test_description_cut_at_features() {
        let entries = parse("name: widget\ndescription: |\n  Summary text.\n\n  ## Features\n  - thing\n");
        assert_eq!(entries[0].short_desc, "Summary text.");
    }

    #[test]
    fn test_remote_config_only_for_remote_runtime() {
        let entries = parse("name: widget\nruntime: remote\nremoteConfig:\n  url: https://mcp.acme.com\n");
        assert!(entries[0].remote_config.is_some());

        let entries = parse("name: widget\nruntime: npx\nremoteConfig:\n  url: https://mcp.acme.com\n");
        assert!(entries[0].remote_config.is_none());
    }

    #[test]
    fn test_entries_without_name_skipped() {
        let entries = parse("description: nameless\n");
        assert!(entries.is_empty());
    }

    #[test]
    fn test_missing_description_defaults_empty() {
        let entries = parse("name: widget\n");
        assert_eq!(entries[0].short_desc, "");
    }
}
