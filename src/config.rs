use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmSettings,
    pub github: GithubSettings,
    pub sync: SyncSettings,
    pub envcheck: EnvCheckSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model used by the tool-definition linter
    pub lint_model: String,
    /// Model used by the official/community ownership judge
    pub judge_model: String,
    /// Model used by the tool-schema diff analysis
    pub diff_model: String,
    pub timeout_ms: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            lint_model: "gpt-5".to_string(),
            judge_model: "gpt-4.1".to_string(),
            diff_model: "gpt-4o-mini".to_string(),
            timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    pub catalog_owner: String,
    pub catalog_repo: String,
    /// Environment variable holding the sync workflow PAT
    pub token_env: String,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            catalog_owner: "obot-platform".to_string(),
            catalog_repo: "mcp-catalog".to_string(),
            token_env: "UPSTREAM_SYNC_WORKFLOW_PAT".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub registry_url: String,
    pub github_registry_url: String,
    pub issue_labels: Vec<String>,
    /// Minimum stars for community servers
    pub star_min: u64,
    /// Maximum days since last push for community servers
    pub recent_days: i64,
    /// Tracking project number in the catalog org
    pub project_number: u64,
    /// Index issue collecting all candidates as sub-issues
    pub index_issue: u64,
    pub state_file: PathBuf,
    pub ai_cache_file: PathBuf,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            registry_url: "https://registry.modelcontextprotocol.io/v0/servers".to_string(),
            github_registry_url: "https://github.com/mcp".to_string(),
            issue_labels: vec!["VerifiedMCPServer".to_string()],
            star_min: 500,
            recent_days: 30,
            project_number: 2,
            index_issue: 143,
            state_file: PathBuf::from("selected_server.json"),
            ai_cache_file: PathBuf::from("ai_categorization_cache.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvCheckSettings {
    /// Directory holding the catalog YAML manifests
    pub catalog_root: PathBuf,
}

impl Default for EnvCheckSettings {
    fn default() -> Self {
        Self {
            catalog_root: PathBuf::from("."),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            llm: LlmSettings::default(),
            github: GithubSettings::default(),
            sync: SyncSettings::default(),
            envcheck: EnvCheckSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let config = Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()))?;
            return Ok(config.with_env_overrides());
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config.with_env_overrides()),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config.with_env_overrides()),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default().with_env_overrides())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply the environment overrides the sync workflow honors in CI
    fn with_env_overrides(self) -> Self {
        self.with_env_from(|name| std::env::var(name).ok())
    }

    /// Env override application, injectable for tests
    fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(repo) = lookup("GITHUB_REPOSITORY") {
            if let Some((owner, name)) = repo.split_once('/') {
                self.github.catalog_owner = owner.to_string();
                self.github.catalog_repo = name.to_string();
            }
        }
        if let Some(owner) = lookup("CATALOG_OWNER") {
            self.github.catalog_owner = owner;
        }
        if let Some(repo) = lookup("CATALOG_REPO") {
            self.github.catalog_repo = repo;
        }
        if let Some(labels) = lookup("ISSUE_LABELS") {
            self.sync.issue_labels = labels
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(n) = lookup("STAR_MIN").and_then(|v| v.parse().ok()) {
            self.sync.star_min = n;
        }
        if let Some(n) = lookup("RECENT_DAYS").and_then(|v| v.parse().ok()) {
            self.sync.recent_days = n;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.llm.lint_model, "gpt-5");
        assert_eq!(config.llm.judge_model, "gpt-4.1");
        assert_eq!(config.llm.diff_model, "gpt-4o-mini");
        assert_eq!(config.github.catalog_owner, "obot-platform");
        assert_eq!(config.sync.star_min, 500);
        assert_eq!(config.sync.recent_days, 30);
        assert_eq!(config.sync.issue_labels, vec!["VerifiedMCPServer".to_string()]);
        assert_eq!(config.sync.state_file, PathBuf::from("selected_server.json"));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "sync:\n  star_min: 100\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.sync.star_min, 100);
        // Untouched sections keep their defaults
        assert_eq!(config.sync.recent_days, 30);
        assert_eq!(config.llm.judge_model, "gpt-4.1");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("GITHUB_REPOSITORY", "acme/catalog"),
            ("STAR_MIN", "42"),
            ("ISSUE_LABELS", "One, Two ,"),
        ]
        .into_iter()
        .collect();

        let config = Config::default().with_env_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.github.catalog_owner, "acme");
        assert_eq!(config.github.catalog_repo, "catalog");
        assert_eq!(config.sync.star_min, 42);
        assert_eq!(config.sync.issue_labels, vec!["One".to_string(), "Two".to_string()]);
    }

    #[test]
    fn test_env_catalog_owner_beats_repository() {
        let env: HashMap<&str, &str> =
            [("GITHUB_REPOSITORY", "acme/catalog"), ("CATALOG_OWNER", "override")]
                .into_iter()
                .collect();

        let config = Config::default().with_env_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.github.catalog_owner, "override");
        assert_eq!(config.github.catalog_repo, "catalog");
    }

    #[test]
    fn test_bad_env_numbers_ignored() {
        let env: HashMap<&str, &str> = [("STAR_MIN", "lots")].into_iter().collect();
        let config = Config::default().with_env_from(|name| env.get(name).map(|v| v.to_string()));
        assert_eq!(config.sync.star_min, 500);
    }
}
