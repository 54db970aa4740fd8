//! Loading tool listings from `mcptools` JSON output.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// One tool as exposed by a server version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(alias = "inputSchema")]
    pub input_schema: Value,
}

/// Load the tools array from an `mcptools` output file.
/// Entries that do not look like tools are skipped.
pub fn load_tools(path: &Path) -> Result<Vec<ToolInfo>> {
    let content = fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&content)?;
    Ok(extract_tools(&doc))
}

/// Extract tool records from a parsed `mcptools` document
pub fn extract_tools(doc: &Value) -> Vec<ToolInfo> {
    doc.get("tools")
        .and_then(Value::as_array)
        .map(|tools| {
            tools
                .iter()
                .filter_map(|tool| match serde_json::from_value(tool.clone()) {
                    Ok(info) => Some(info),
                    Err(e) => {
                        log::warn!("Skipping malformed tool entry: {}", e);
                        None
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write as _;
    use tempfile::TempDir;

    #[test]
    fn test_extract_tools() {
        let doc = json!({
            "tools": [
                { "name": "a", "description": "first", "inputSchema": { "type": "object" } },
                { "name": "b" }
            ]
        });

        let tools = extract_tools(&doc);
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "a");
        assert_eq!(tools[0].input_schema["type"], "object");
        assert_eq!(tools[1].description, "");
    }

    #[test]
    fn test_extract_tools_missing_key() {
        assert!(extract_tools(&json!({})).is_empty());
        assert!(extract_tools(&json!({ "tools": "nope" })).is_empty());
    }

    #[test]
    fn test_serialize_uses_snake_case_schema_key() {
        let tool = ToolInfo {
            name: "a".to_string(),
            description: String::new(),
            input_schema: json!({ "type": "object" }),
        };
        let serialized = serde_json::to_value(&tool).unwrap();
        assert!(serialized.get("input_schema").is_some());
        assert!(serialized.get("inputSchema").is_none());
    }

    #[test]
    fn test_load_tools_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(br#"{"tools": [{"name": "x", "description": "d", "inputSchema": {}}]}"#)
            .unwrap();

        let tools = load_tools(&path).unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "x");
    }

    #[test]
    fn test_load_tools_missing_file() {
        assert!(load_tools(Path::new("/nonexistent/tools.json")).is_err());
    }
}
