//! Tool definition loading and OpenAI function-format conversion.
//!
//! Catalog manifests are loose about where tools live: a document may be
//! a bare list of tools, hold them under a preview key, or itself be a
//! single tool. `params` is equally loose - a mapping of name to
//! description-or-schema, or a list of parameter objects.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::Result;

/// Keys that may hold a tool list inside a YAML document
const TOOL_LIST_KEYS: &[&str] = &["toolPreview", "tools", "mcp_tools", "tool_list"];

/// Collect tool definitions from every document in a YAML file
pub fn load_tools_from_yaml(content: &str) -> Result<Vec<Value>> {
    let mut tools = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let yaml = serde_yaml::Value::deserialize(document)?;
        let doc = serde_json::to_value(&yaml)?;
        tools.extend(tools_in_doc(&doc));
    }
    Ok(tools)
}

/// Tool definitions found in one parsed document
pub fn tools_in_doc(doc: &Value) -> Vec<Value> {
    if let Some(list) = doc.as_array() {
        return list.clone();
    }
    if let Some(map) = doc.as_object() {
        for key in TOOL_LIST_KEYS {
            if let Some(list) = map.get(*key).and_then(Value::as_array) {
                return list.clone();
            }
        }
        // A lone mapping with name + description is itself one tool
        if map.contains_key("name") && map.contains_key("description") {
            return vec![doc.clone()];
        }
    }
    Vec::new()
}

/// Convert an MCP tool definition to OpenAI function-calling format
pub fn to_openai_function(tool: &Value) -> Value {
    let mut function = Map::new();
    function.insert(
        "name".to_string(),
        json!(tool["name"].as_str().unwrap_or("unnamed_tool")),
    );
    function.insert(
        "description".to_string(),
        json!(tool["description"].as_str().unwrap_or("")),
    );

    if let Some(parameters) = convert_params(tool.get("params")) {
        function.insert("parameters".to_string(), parameters);
    }

    json!({ "type": "function", "function": function })
}

/// Build a JSON-schema `parameters` object from a loose `params` field.
/// Scalar `params` values produce no parameters key at all.
fn convert_params(params: Option<&Value>) -> Option<Value> {
    let mut properties = Map::new();
    let mut required: Vec<Value> = Vec::new();

    match params {
        Some(Value::Object(map)) => {
            for (name, info) in map {
                match info {
                    Value::String(description) => {
                        properties.insert(
                            name.clone(),
                            json!({ "type": "string", "description": description }),
                        );
                    }
                    Value::Object(detail) => {
                        properties.insert(name.clone(), info.clone());
                        if detail.get("required").and_then(Value::as_bool).unwrap_or(false) {
                            required.push(json!(name));
                        }
                    }
                    _ => {}
                }
            }
        }
        Some(Value::Array(list)) => {
            for param in list {
                let Some(obj) = param.as_object() else {
                    continue;
                };
                let Some(name) = obj.get("name").and_then(Value::as_str) else {
                    continue;
                };
                let param_type = obj.get("type").and_then(Value::as_str).unwrap_or("string");
                let description = obj
                    .get("description")
                    .or_else(|| obj.get("desc"))
                    .and_then(Value::as_str)
                    .unwrap_or("");
                properties.insert(
                    name.to_string(),
                    json!({ "type": param_type, "description": description }),
                );
                if obj.get("required").and_then(Value::as_bool).unwrap_or(false) {
                    required.push(json!(name));
                }
            }
        }
        None => {}
        Some(_) => return None,
    }

    Some(json!({
        "type": "object",
        "properties": properties,
        "required": required
    }))
}
