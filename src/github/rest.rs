//! GitHub REST operations: repository metadata, trees, and file contents.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use super::client::{GITHUB_API_URL, GithubClient};
use crate::error::{McpOpsError, Result};

/// Repository metadata relevant to the popularity gate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoInfo {
    pub owner_login: String,
    pub owner_type: String,
    pub stars: u64,
    pub pushed_at: Option<String>,
    pub is_fork: bool,
    pub is_archived: bool,
}

impl RepoInfo {
    /// Build from a `/repos/{owner}/{repo}` response
    pub fn from_value(data: &Value) -> Self {
        let owner = data.get("owner").cloned().unwrap_or(Value::Null);
        Self {
            owner_login: owner["login"].as_str().unwrap_or_default().to_string(),
            owner_type: owner["type"].as_str().unwrap_or_default().to_string(),
            stars: data["stargazers_count"].as_u64().unwrap_or(0),
            pushed_at: data["pushed_at"].as_str().map(String::from),
            is_fork: data["fork"].as_bool().unwrap_or(false),
            is_archived: data["archived"].as_bool().unwrap_or(false),
        }
    }
}

impl GithubClient {
    /// Repository metadata for the popularity gate
    pub async fn repo_info(&self, owner: &str, repo: &str) -> Result<RepoInfo> {
        let data = self
            .get_json(&format!("{}/repos/{}/{}", GITHUB_API_URL, owner, repo))
            .await?;
        Ok(RepoInfo::from_value(&data))
    }

    /// Default branch of a repository, falling back to `main`
    pub async fn default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        let data = self
            .get_json(&format!("{}/repos/{}/{}", GITHUB_API_URL, owner, repo))
            .await?;
        Ok(data["default_branch"].as_str().unwrap_or("main").to_string())
    }

    /// List `*.yml`/`*.yaml` blobs in the repository root
    pub async fn list_root_yaml_paths(&self, owner: &str, repo: &str) -> Result<Vec<String>> {
        let branch = self.default_branch(owner, repo).await?;
        let tree = self
            .get_json(&format!(
                "{}/repos/{}/{}/git/trees/{}",
                GITHUB_API_URL, owner, repo, branch
            ))
            .await?;
        Ok(root_yaml_paths(&tree))
    }

    /// Read a file's text content via the contents API
    pub async fn read_file_text(&self, owner: &str, repo: &str, path: &str) -> Result<String> {
        let data = self
            .get_json(&format!(
                "{}/repos/{}/{}/contents/{}",
                GITHUB_API_URL, owner, repo, path
            ))
            .await?;

        if data["encoding"].as_str() == Some("base64") {
            if let Some(content) = data["content"].as_str() {
                return decode_blob(content);
            }
        }

        // Fallback when the API answers with a download redirect
        if let Some(download_url) = data["download_url"].as_str() {
            let response = self.client.get(download_url).send().await?;
            if !response.status().is_success() {
                return Err(McpOpsError::Github(format!(
                    "Download of {} failed: HTTP {}",
                    path,
                    response.status()
                )));
            }
            return Ok(response.text().await?);
        }

        Err(McpOpsError::Github(format!(
            "Unsupported content response shape for {}",
            path
        )))
    }
}

/// Root-level YAML blob paths from a git tree response
pub fn root_yaml_paths(tree: &Value) -> Vec<String> {
    let mut paths = Vec::new();
    if let Some(nodes) = tree.get("tree").and_then(Value::as_array) {
        for node in nodes {
            let path = node["path"].as_str().unwrap_or_default();
            let lower = path.to_lowercase();
            if node["type"].as_str() == Some("blob")
                && (lower.ends_with(".yaml") || lower.ends_with(".yml"))
                && !path.contains('/')
            {
                paths.push(path.to_string());
            }
        }
    }
    paths
}

/// Decode a base64 contents blob; GitHub wraps the payload in newlines
fn decode_blob(content: &str) -> Result<String> {
    let stripped: String = content.split_whitespace().collect();
    let bytes = STANDARD
        .decode(stripped)
        .map_err(|e| McpOpsError::Github(format!("Invalid base64 content: {}", e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
