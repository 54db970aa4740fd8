//! Severity levels and ranking for lint findings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lint severity, ordered by how loudly a run should fail.
///
/// `Unknown` ranks above `High`: a tool the model could not assess is
/// treated as worse than a confirmed high finding when deciding the exit
/// code, while per-file rollups prefer concrete findings (see
/// [`overall_severity`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Unknown,
}

impl Severity {
    /// Map a model-reported risk level to a severity.
    /// `critical` collapses into `high`; anything unrecognized is unknown.
    pub fn from_risk_level(risk_level: &str) -> Self {
        match risk_level.to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" | "critical" => Self::High,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Roll per-tool severities up to a file verdict.
///
/// Concrete findings win: high, then medium, then low. Only a file whose
/// assessable tools found nothing but that still has unassessed tools
/// reports unknown.
pub fn overall_severity(severities: &[Severity]) -> Severity {
    for level in [Severity::High, Severity::Medium, Severity::Low] {
        if severities.contains(&level) {
            return level;
        }
    }
    if severities.contains(&Severity::Unknown) {
        return Severity::Unknown;
    }
    Severity::Info
}
