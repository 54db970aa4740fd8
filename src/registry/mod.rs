//! Upstream registry access.
//!
//! Two upstreams feed the sync workflow: the public MCP registry API
//! (paginated JSON) and the GitHub MCP registry page (JSON embedded in
//! HTML). Both produce the same `ServerEntry` record.

pub mod github_page;
pub mod mcp;
pub mod server;
pub mod version;

pub use github_page::GithubRegistryScraper;
pub use mcp::RegistryClient;
pub use server::{PackageRef, RemoteEndpoint, Repository, ServerEntry, ServerKind, UpstreamSource};
pub use version::Version;
