//! Tool-schema diff analysis between two package versions.
//!
//! Loads two `mcptools` JSON listings, asks the model for a Markdown
//! impact analysis, and prints it verbatim.

pub mod analyze;
pub mod schema;

pub use analyze::{analyze, build_prompt};
pub use schema::{ToolInfo, extract_tools, load_tools};

use std::path::Path;

use crate::error::Result;
use crate::llm::LlmClient;

/// Load both listings, analyze, and print the Markdown to stdout
pub async fn run(
    llm: &dyn LlmClient,
    model: &str,
    old_json: &Path,
    new_json: &Path,
    package: &str,
    old_version: &str,
    new_version: &str,
) -> Result<()> {
    let old_tools = load_tools(old_json)?;
    let new_tools = load_tools(new_json)?;

    let analysis = analyze(llm, model, package, old_version, new_version, &old_tools, &new_tools).await?;
    println!("{}", analysis);
    Ok(())
}
