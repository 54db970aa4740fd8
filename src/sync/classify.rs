//! Official/community ownership judgment.
//!
//! Whether a server is "official" is a judgment call about brand
//! ownership, not something a heuristic can settle, so the decision is
//! delegated to the model with the evidence serialized as JSON. The
//! popularity gate for community servers stays plain code.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{McpOpsError, Result};
use crate::github::RepoInfo;
use crate::llm::{ChatRequest, LlmClient};
use crate::normalize::days_since;
use crate::registry::ServerEntry;

/// System prompt for the ownership judge
pub const OWNERSHIP_JUDGE_PROMPT: &str = r#"You are a reviewer deciding whether a GitHub MCP server is "official" or "community".

Definition:
- "Official": Published by the organization that owns/operates the underlying product/service the server integrates with (e.g., Google for Gmail, Teamwork for teamwork.com).
- "Community": Any third-party implementation for someone else's product/service.

Inputs you may receive:
- server_name, github_org, repository URL, remotes (URLs), description,
- repo metadata (owner type Organization/User, verified flag, fork/archived),
- packages/identifiers (e.g., npm scope, docker repo) if available.

Heuristics (no static allowlists; infer from evidence):
Strong signals of Official:
- Organization name matches the product/brand (normalized) found in server_name or repo.
- Remote endpoints are on the organization's domain and reference the product.
- Verified GitHub Organization; repository is not a fork and not archived.
- Package namespace owned by the org (npm scope, docker image under the org).
- If "Test" appears in the server_name it is likely a test server and should be community; use your best judgment.

Generic services require stricter proof:
- For generic/ubiquitous services (gmail, postgres, postgresql, mysql, slack, github, jira, confluence, notion, airtable, sheets, docs):
  Only mark Official if the publisher is the actual brand owner.
  Otherwise classify as Community, even if the org's domain appears in remotes.

Weak/noisy signals (use with caution):
- Reversed-domain in server name and domain similarity alone are insufficient for generic services.

Negative signals (reduce confidence):
- Repo is a fork or archived; owner is a personal user (not an org);
- Remotes hosted on generic third-party platforms without clear brand ownership evidence.

Output JSON only:
{ "decision": "official" | "community" | "uncertain", "confidence": 0.0..1.0, "reason": "<one concise sentence>" }
Keep reasons short and evidence-based (mention org, service, and the key signal)."#;

/// The judge's three-way call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    Official,
    Community,
    Uncertain,
}

impl Ownership {
    /// Lenient parse for cached decision strings; anything unrecognized
    /// is treated as uncertain (dropped)
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "official" => Self::Official,
            "community" => Self::Community,
            _ => Self::Uncertain,
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Official => "official",
            Self::Community => "community",
            Self::Uncertain => "uncertain",
        };
        write!(f, "{}", name)
    }
}

/// A full judge verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipDecision {
    pub decision: Ownership,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

/// Ask the model whether a server is official or community
pub async fn judge_ownership(
    llm: &dyn LlmClient,
    model: &str,
    server: &ServerEntry,
) -> Result<OwnershipDecision> {
    let evidence = serde_json::to_string(server)?;
    let request = ChatRequest::new(OWNERSHIP_JUDGE_PROMPT)
        .with_user(format!("Input:\n{}", evidence))
        .with_model(model);

    let value = llm.complete_json(request).await?;
    serde_json::from_value(value)
        .map_err(|e| McpOpsError::Llm(format!("Ownership judgment did not match expected shape: {}", e)))
}

/// Community servers must clear the popularity bar: enough stars, pushed
/// recently, and not archived.
pub fn is_popular_community(meta: &RepoInfo, star_min: u64, recent_days: i64) -> bool {
    meta.stars >= star_min
        && days_since(meta.pushed_at.as_deref()).is_some_and(|days| days <= recent_days)
        && !meta.is_archived
}
