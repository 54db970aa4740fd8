//! Tracking-issue content for discovered servers.

use crate::registry::ServerEntry;

/// Issue title for a candidate server
pub fn issue_title(server: &ServerEntry) -> String {
    let name = if server.name.is_empty() { "Unknown" } else { &server.name };
    format!("[MCP Catalog] New MCP server candidate: {}", name)
}

/// Issue body listing everything a reviewer needs to triage the candidate
pub fn issue_body(server: &ServerEntry, catalog_owner: &str, catalog_repo: &str) -> String {
    let mut lines = vec![
        format!("Automatically discovered via MCP registry ({}).", server.upstream_source),
        String::new(),
    ];

    if !server.name.is_empty() {
        lines.push(format!("**Name:** {}", server.name));
    }
    if let Some(kind) = server.kind {
        lines.push(format!("**Kind:** {}", kind));
    }
    if let Some(description) = server.description.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("**Description:** {}", description));
    }
    if let Some(version) = server.version.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("**Version:** {}", version));
    }
    if let Some(repo_url) = server.repo_url() {
        lines.push(format!("**Repository:** {}", repo_url));
    }

    if !server.packages.is_empty() {
        lines.push(String::new());
        lines.push("**Packages:**".to_string());
        for package in &server.packages {
            if !package.identifier.is_empty() {
                lines.push(format!(
                    "  - {} (v{}, {})",
                    package.identifier, package.version, package.registry_type
                ));
            }
        }
    }

    if !server.remotes.is_empty() {
        lines.push(String::new());
        lines.push("**Remote Endpoints:**".to_string());
        for remote in &server.remotes {
            if !remote.url.is_empty() {
                lines.push(format!("  - {}: {}", remote.kind, remote.url));
            }
        }
    }

    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(format!(
        "If we want to catalog this server, please add/update its YAML in `{}/{}` and link the PR here.",
        catalog_owner, catalog_repo
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{PackageRef, RemoteEndpoint, Repository, ServerKind, UpstreamSource};

    fn full_server() -> ServerEntry {
        ServerEntry {
            name: "acme/widget".to_string(),
            description: Some("Widget things".to_string()),
            version: Some("1.2.3".to_string()),
            repository: Some(Repository {
                url: "https://github.com/acme/widget".to_string(),
                source: None,
            }),
            packages: vec![PackageRef {
                identifier: "@acme/widget".to_string(),
                version: "1.2.3".to_string(),
                registry_type: "npm".to_string(),
            }],
            remotes: vec![RemoteEndpoint {
                kind: "streamable-http".to_string(),
                url: "https://mcp.acme.com".to_string(),
            }],
            upstream_source: UpstreamSource::ModelContextProtocol,
            kind: Some(ServerKind::Official),
            ..Default::default()
        }
    }

    #[test]
    fn test_issue_title() {
        assert_eq!(
            issue_title(&full_server()),
            "[MCP Catalog] New MCP server candidate: acme/widget"
        );
        assert_eq!(
            issue_title(&ServerEntry::default()),
            "[MCP Catalog] New MCP server candidate: Unknown"
        );
    }

    #[test]
    fn test_issue_body_full() {
        let body = issue_body(&full_server(), "obot-platform", "mcp-catalog");

        assert!(body.starts_with("Automatically discovered via MCP registry (modelcontextprotocol.io)."));
        assert!(body.contains("**Name:** acme/widget"));
        assert!(body.contains("**Kind:** official"));
        assert!(body.contains("**Description:** Widget things"));
        assert!(body.contains("**Version:** 1.2.3"));
        assert!(body.contains("**Repository:** https://github.com/acme/widget"));
        assert!(body.contains("**Packages:**"));
        assert!(body.contains("  - @acme/widget (v1.2.3, npm)"));
        assert!(body.contains("**Remote Endpoints:**"));
        assert!(body.contains("  - streamable-http: https://mcp.acme.com"));
        assert!(body.contains("`obot-platform/mcp-catalog`"));
    }

    #[test]
    fn test_issue_body_sparse() {
        let server = ServerEntry {
            name: "bare".to_string(),
            ..Default::default()
        };
        let body = issue_body(&server, "o", "r");

        assert!(body.contains("**Name:** bare"));
        assert!(!body.contains("**Kind:**"));
        assert!(!body.contains("**Packages:**"));
        assert!(!body.contains("**Remote Endpoints:**"));
    }
}
