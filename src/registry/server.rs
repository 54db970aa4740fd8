//! Registry server records and identity keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::normalize::parse_repo_url;

/// Registry extension namespace carrying official metadata
pub const OFFICIAL_META_KEY: &str = "io.modelcontextprotocol.registry/official";

/// Source repository reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Published package reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageRef {
    pub identifier: String,
    pub version: String,
    #[serde(rename = "registryType", alias = "registry_type")]
    pub registry_type: String,
}

/// Hosted remote endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteEndpoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Which upstream a server record came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamSource {
    #[default]
    Unknown,
    ModelContextProtocol,
    GithubMcp,
}

impl fmt::Display for UpstreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::ModelContextProtocol => "modelcontextprotocol.io",
            Self::GithubMcp => "github.com/mcp",
        };
        write!(f, "{}", name)
    }
}

/// Final classification attached during the sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Official,
    Community,
    Remote,
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Official => "official",
            Self::Community => "community",
            Self::Remote => "remote",
        };
        write!(f, "{}", name)
    }
}

/// One server record from an upstream registry.
///
/// The serde fields mirror the registry payload; the `skip` fields are
/// attached as the sync run learns more about the entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<Repository>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<PackageRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remotes: Vec<RemoteEndpoint>,
    #[serde(alias = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    /// Lifecycle status lifted from the registry envelope
    #[serde(skip)]
    pub active: Option<String>,
    #[serde(skip)]
    pub upstream_source: UpstreamSource,
    #[serde(skip)]
    pub kind: Option<ServerKind>,
}

impl ServerEntry {
    /// Repository URL, if the record carries one
    pub fn repo_url(&self) -> Option<&str> {
        self.repository.as_ref().map(|r| r.url.as_str()).filter(|u| !u.is_empty())
    }

    /// Whether the registry marks this entry active
    pub fn is_active(&self) -> bool {
        self.active.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("active"))
    }

    /// Stable identity used to collapse multiple versions of one server.
    ///
    /// Preference order: official registry serverId, then lowercased name,
    /// then `repo:owner/name` from a GitHub repository URL. None when the
    /// record has no usable identity.
    pub fn server_key(&self) -> Option<String> {
        let server_id = self
            .meta
            .as_ref()
            .and_then(|m| m.get(OFFICIAL_META_KEY))
            .and_then(|m| m.get("serverId"))
            .and_then(Value::as_str);
        if let Some(id) = server_id {
            return Some(format!("id:{}", id));
        }

        if !self.name.is_empty() {
            return Some(format!("name:{}", self.name.to_lowercase()));
        }

        if let Some((owner, repo)) = self.repo_url().and_then(parse_repo_url) {
            return Some(format!("repo:{}/{}", owner.to_lowercase(), repo.to_lowercase()));
        }

        None
    }
}
