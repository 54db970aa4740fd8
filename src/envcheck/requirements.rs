//! Env-var requirements declared in catalog YAML manifests.

use serde::Serialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// One declared environment variable
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnvVarSpec {
    pub key: String,
    pub name: String,
    pub description: String,
    pub required: bool,
    pub sensitive: bool,
}

/// Everything the manifest says about a package's environment
#[derive(Debug, Clone, Serialize)]
pub struct EnvRequirements {
    pub package: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaml_file: Option<String>,
    pub env_vars: Vec<EnvVarSpec>,
    pub required_env_vars: Vec<String>,
}

impl EnvRequirements {
    fn not_found(package: &str) -> Self {
        Self {
            package: package.to_string(),
            found: false,
            yaml_file: None,
            env_vars: Vec::new(),
            required_env_vars: Vec::new(),
        }
    }
}

/// Manifest filenames tried for a package, in order
pub fn candidate_manifests(root: &Path, package: &str) -> Vec<PathBuf> {
    vec![
        root.join(format!("{}.yaml", package)),
        root.join(format!("{}.yml", package)),
        root.join(format!("{}.yaml", package.replace('-', "_"))),
    ]
}

/// Read a package's env requirements from its catalog manifest.
/// Missing or unreadable manifests report `found: false`.
pub fn load_requirements(root: &Path, package: &str) -> EnvRequirements {
    let Some(path) = candidate_manifests(root, package).into_iter().find(|p| p.exists()) else {
        return EnvRequirements::not_found(package);
    };

    let doc: Value = match fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_yaml::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("Error reading {}: {}", path.display(), e);
            return EnvRequirements::not_found(package);
        }
    };

    let env_vars = parse_env_vars(&doc);
    let required_env_vars = env_vars
        .iter()
        .filter(|var| var.required)
        .map(|var| var.key.clone())
        .collect();

    EnvRequirements {
        package: package.to_string(),
        found: true,
        yaml_file: path.file_name().map(|n| n.to_string_lossy().into_owned()),
        env_vars,
        required_env_vars,
    }
}

/// Parse the manifest's `env` list; entries without a key are dropped
fn parse_env_vars(doc: &Value) -> Vec<EnvVarSpec> {
    let Some(entries) = doc.get("env").and_then(Value::as_sequence) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let key = entry.get("key")?.as_str()?.to_string();
            Some(EnvVarSpec {
                name: entry
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(&key)
                    .to_string(),
                description: entry
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                required: entry.get("required").and_then(Value::as_bool).unwrap_or(false),
                sensitive: entry.get("sensitive").and_then(Value::as_bool).unwrap_or(false),
                key,
            })
        })
        .collect()
}
