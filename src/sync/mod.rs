//! Upstream registry synchronization.
//!
//! Polls the two upstream registries, dedupes against the curated
//! catalog and previous runs, classifies candidates as official or
//! community via the model, and opens tracking issues for the keepers.
//! Two flat JSON files carry state across runs.

pub mod cache;
pub mod classify;
pub mod filter;
pub mod issues;
pub mod state;
pub mod workflow;

pub use cache::{CachedDecision, DecisionCache, cache_key};
pub use classify::{Ownership, OwnershipDecision, is_popular_community, judge_ownership};
pub use filter::{FilterContext, FilterOutcome, OverlapOutcome, check_display_name_overlaps, filter_servers};
pub use issues::{issue_body, issue_title};
pub use state::{SelectedServer, SelectedServers};
pub use workflow::run;

use chrono::Utc;

/// Timestamp format shared by the state and cache files
pub(crate) fn utc_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_stamp_shape() {
        let stamp = utc_stamp();
        assert!(stamp.ends_with(" UTC"));
        // YYYY-MM-DD HH:MM:SS UTC
        assert_eq!(stamp.len(), 23);
    }
}
