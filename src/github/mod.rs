//! GitHub API access for the sync workflow.
//!
//! One authenticated client serves REST (repository metadata, trees,
//! contents, issues) and GraphQL (projects, sub-issues).

pub mod client;
pub mod graphql;
pub mod issues;
pub mod rest;

pub use client::GithubClient;
pub use issues::IssueRef;
pub use rest::RepoInfo;
