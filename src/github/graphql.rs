//! GraphQL operations: project lookup, project items, and sub-issues.

use serde_json::{Value, json};

use super::client::{GITHUB_GRAPHQL_URL, GithubClient};
use crate::error::Result;

/// Probes organization and user in one query; exactly one side resolves
const PROJECT_ID_QUERY: &str = r#"
query($owner: String!, $number: Int!) {
  organization(login: $owner) {
    projectV2(number: $number) { id }
  }
  user(login: $owner) {
    projectV2(number: $number) { id }
  }
}
"#;

const ADD_ITEM_MUTATION: &str = r#"
mutation($projectId: ID!, $contentId: ID!) {
  addProjectV2ItemById(input: {projectId: $projectId, contentId: $contentId}) {
    item { id }
  }
}
"#;

const ADD_SUB_ISSUE_MUTATION: &str = r#"
mutation($parentIssueId: ID!, $subIssueId: ID!) {
  addSubIssue(input: {issueId: $parentIssueId, subIssueId: $subIssueId}) {
    issue { id title }
    subIssue { id title url }
  }
}
"#;

impl GithubClient {
    /// Resolve a ProjectV2 id from its number, probing org and user scopes
    pub async fn project_id(&self, owner: &str, number: u64) -> Result<Option<String>> {
        let body = json!({
            "query": PROJECT_ID_QUERY,
            "variables": { "owner": owner, "number": number }
        });
        let data = self.post_json(GITHUB_GRAPHQL_URL, &body).await?;
        Ok(extract_project_id(&data))
    }

    /// Add an issue to a project. Returns false (after logging) on
    /// GraphQL-level errors instead of aborting the workflow.
    pub async fn add_issue_to_project(&self, project_id: &str, issue_node_id: &str) -> Result<bool> {
        let body = json!({
            "query": ADD_ITEM_MUTATION,
            "variables": { "projectId": project_id, "contentId": issue_node_id }
        });
        let data = self.post_json(GITHUB_GRAPHQL_URL, &body).await?;

        let errors = graphql_errors(&data);
        if !errors.is_empty() {
            for message in &errors {
                log::warn!("add_issue_to_project: {}", message);
            }
            return Ok(false);
        }

        Ok(data.pointer("/data/addProjectV2ItemById/item/id").is_some())
    }

    /// Link an issue as a sub-issue of the index issue
    pub async fn add_sub_issue(&self, parent_node_id: &str, child_node_id: &str) -> Result<bool> {
        let body = json!({
            "query": ADD_SUB_ISSUE_MUTATION,
            "variables": { "parentIssueId": parent_node_id, "subIssueId": child_node_id }
        });
        let data = self.post_json(GITHUB_GRAPHQL_URL, &body).await?;

        let errors = graphql_errors(&data);
        if !errors.is_empty() {
            for message in &errors {
                log::warn!("add_sub_issue: {}", message);
            }
            return Ok(false);
        }

        Ok(data.pointer("/data/addSubIssue").map(|v| !v.is_null()).unwrap_or(false))
    }
}

/// Project id from either the organization or user branch
pub fn extract_project_id(data: &Value) -> Option<String> {
    data.pointer("/data/organization/projectV2/id")
        .or_else(|| data.pointer("/data/user/projectV2/id"))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Messages from a GraphQL `errors` array
pub fn graphql_errors(data: &Value) -> Vec<String> {
    data.get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|e| e["message"].as_str().unwrap_or("unknown error").to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_project_id_organization() {
        let data = json!({
            "data": {
                "organization": { "projectV2": { "id": "PVT_org" } },
                "user": null
            }
        });
        assert_eq!(extract_project_id(&data).as_deref(), Some("PVT_org"));
    }

    #[test]
    fn test_extract_project_id_user() {
        let data = json!({
            "data": {
                "organization": null,
                "user": { "projectV2": { "id": "PVT_user" } }
            }
        });
        assert_eq!(extract_project_id(&data).as_deref(), Some("PVT_user"));
    }

    #[test]
    fn test_extract_project_id_missing() {
        let data = json!({ "data": { "organization": null, "user": null } });
        assert!(extract_project_id(&data).is_none());
    }

    #[test]
    fn test_graphql_errors() {
        let data = json!({
            "errors": [
                { "message": "first" },
                { "other": true }
            ]
        });
        assert_eq!(graphql_errors(&data), vec!["first".to_string(), "unknown error".to_string()]);
    }

    #[test]
    fn test_graphql_errors_absent() {
        assert!(graphql_errors(&json!({ "data": {} })).is_empty());
    }
}
