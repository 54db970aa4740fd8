//! mcpops - operational tooling for a curated MCP server catalog
//!
//! Four independent subcommands share this library: a tool-definition
//! security linter (`lint`), an upstream registry sync workflow (`sync`),
//! a tool-schema diff analyzer (`diff-tools`), and an env-var requirement
//! checker (`env-check`). Each is a sequential pipeline over third-party
//! HTTP APIs; there is no shared runtime state between them.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diff;
pub mod envcheck;
pub mod error;
pub mod github;
pub mod lint;
pub mod llm;
pub mod normalize;
pub mod registry;
pub mod sync;

pub use error::{McpOpsError, Result};
