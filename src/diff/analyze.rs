//! LLM analysis of tool-schema changes between two package versions.

use super::schema::ToolInfo;
use crate::error::Result;
use crate::llm::{ChatRequest, LlmClient};

/// System prompt for the change analyst persona
pub const DIFF_ANALYST_SYSTEM: &str = "You are an expert at analyzing API and tool changes, \
identifying breaking changes, and assessing impact.";

/// Low temperature keeps repeated analyses of the same diff consistent
const DIFF_TEMPERATURE: f32 = 0.3;
const DIFF_MAX_TOKENS: u32 = 2000;

/// Build the Markdown analysis prompt
pub fn build_prompt(
    package: &str,
    old_version: &str,
    new_version: &str,
    old_tools: &[ToolInfo],
    new_tools: &[ToolInfo],
) -> Result<String> {
    let old_json = serde_json::to_string_pretty(old_tools)?;
    let new_json = serde_json::to_string_pretty(new_tools)?;

    Ok(format!(
        "You are analyzing changes in an MCP (Model Context Protocol) server between two versions.\n\n\
         Package: {package}\n\
         Old Version: {old_version}\n\
         New Version: {new_version}\n\n\
         Old version tools ({old_count} total):\n{old_json}\n\n\
         New version tools ({new_count} total):\n{new_json}\n\n\
         Please provide a comprehensive analysis in Markdown format with the following sections:\n\n\
         ## MCP Tools Analysis: {old_version} -> {new_version}\n\n\
         ### Summary\n\
         Provide a brief overview of the changes (2-3 sentences).\n\n\
         ### Added Tools\n\
         List any new tools with brief descriptions of what they do.\n\n\
         ### Removed Tools\n\
         List any removed tools and note if this could be a breaking change.\n\n\
         ### Modified Tools\n\
         List tools that exist in both versions but have changed schemas or descriptions.\n\
         Highlight any breaking changes (required parameters added, parameters removed, type changes).\n\n\
         ### Impact Assessment\n\
         Provide a risk level (Low/Medium/High) and explain:\n\
         - Any breaking changes\n\
         - New capabilities\n\
         - Potential issues\n\n\
         ### Recommendation\n\
         Should this update be merged? Any concerns or testing suggestions?\n\n\
         Keep the analysis concise but informative. Focus on practical implications for users.",
        old_count = old_tools.len(),
        new_count = new_tools.len(),
    ))
}

/// Run the analysis and return the model's Markdown verbatim
pub async fn analyze(
    llm: &dyn LlmClient,
    model: &str,
    package: &str,
    old_version: &str,
    new_version: &str,
    old_tools: &[ToolInfo],
    new_tools: &[ToolInfo],
) -> Result<String> {
    let prompt = build_prompt(package, old_version, new_version, old_tools, new_tools)?;
    let request = ChatRequest::new(DIFF_ANALYST_SYSTEM)
        .with_user(prompt)
        .with_model(model)
        .with_temperature(DIFF_TEMPERATURE)
        .with_max_tokens(DIFF_MAX_TOKENS);

    Ok(llm.complete(request).await?.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use serde_json::json;

    fn tool(name: &str) -> ToolInfo {
        ToolInfo {
            name: name.to_string(),
            description: format!("does {}", name),
            input_schema: json!({ "type": "object" }),
        }
    }

    #[test]
    fn test_build_prompt_includes_versions_and_counts() {
        let prompt = build_prompt("widget", "1.0.0", "2.0.0", &[tool("a")], &[tool("a"), tool("b")]).unwrap();

        assert!(prompt.contains("Package: widget"));
        assert!(prompt.contains("Old Version: 1.0.0"));
        assert!(prompt.contains("New Version: 2.0.0"));
        assert!(prompt.contains("Old version tools (1 total)"));
        assert!(prompt.contains("New version tools (2 total)"));
        assert!(prompt.contains("### Impact Assessment"));
        assert!(prompt.contains("does b"));
    }

    #[tokio::test]
    async fn test_analyze_returns_model_markdown() {
        let mock = MockLlmClient::new("## MCP Tools Analysis\n\nNothing changed.");
        let result = analyze(&mock, "gpt-4o-mini", "widget", "1.0.0", "1.0.1", &[], &[]).await.unwrap();

        assert!(result.starts_with("## MCP Tools Analysis"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_propagates_api_failure() {
        let mock = MockLlmClient::failing();
        let result = analyze(&mock, "gpt-4o-mini", "widget", "1.0.0", "1.0.1", &[], &[]).await;
        assert!(result.is_err());
    }
}
