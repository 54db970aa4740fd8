//! Issue creation and lookup.

use serde_json::{Value, json};

use super::client::{GITHUB_API_URL, GithubClient};
use crate::error::Result;

/// Handle to a created or fetched issue
#[derive(Debug, Clone, Default)]
pub struct IssueRef {
    pub html_url: String,
    pub number: u64,
    pub node_id: String,
}

impl IssueRef {
    /// Build from an issues API response
    pub fn from_value(data: &Value) -> Self {
        Self {
            html_url: data["html_url"].as_str().unwrap_or("unknown URL").to_string(),
            number: data["number"].as_u64().unwrap_or(0),
            node_id: data["node_id"].as_str().unwrap_or_default().to_string(),
        }
    }
}

impl GithubClient {
    /// Open a tracking issue in the given repository
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<IssueRef> {
        let payload = json!({
            "title": title,
            "body": body,
            "labels": labels,
            "type": "Feature"
        });
        let data = self
            .post_json(&format!("{}/repos/{}/{}/issues", GITHUB_API_URL, owner, repo), &payload)
            .await?;
        Ok(IssueRef::from_value(&data))
    }

    /// GraphQL node id for an existing issue
    pub async fn issue_node_id(&self, owner: &str, repo: &str, number: u64) -> Result<String> {
        let data = self
            .get_json(&format!(
                "{}/repos/{}/{}/issues/{}",
                GITHUB_API_URL, owner, repo, number
            ))
            .await?;
        Ok(data["node_id"].as_str().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_ref_from_value() {
        let data = json!({
            "html_url": "https://github.com/acme/catalog/issues/7",
            "number": 7,
            "node_id": "I_abc123"
        });

        let issue = IssueRef::from_value(&data);
        assert_eq!(issue.html_url, "https://github.com/acme/catalog/issues/7");
        assert_eq!(issue.number, 7);
        assert_eq!(issue.node_id, "I_abc123");
    }

    #[test]
    fn test_issue_ref_from_sparse_value() {
        let issue = IssueRef::from_value(&json!({}));
        assert_eq!(issue.html_url, "unknown URL");
        assert_eq!(issue.number, 0);
        assert!(issue.node_id.is_empty());
    }
}
