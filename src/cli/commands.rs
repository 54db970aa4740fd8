//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - lint: LLM security analysis of tool definitions
//! - sync: upstream registry synchronization
//! - diff-tools: tool-schema change analysis
//! - env-check: env-var requirement reporting

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::lint::Severity;

/// mcpops - operational tooling for a curated MCP server catalog
#[derive(Parser, Debug)]
#[command(name = "mcpops")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze MCP tool definitions for malicious content via LLM
    Lint {
        /// YAML files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write a JSON report to this file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Exit non-zero if overall severity reaches this level
        #[arg(long, value_enum, default_value_t = FailOn::High)]
        fail_on: FailOn,

        /// Exit with code 3 when the model flags malicious tools (default)
        #[arg(long, overrides_with = "no_fail_on_malicious")]
        fail_on_malicious: bool,

        /// Disable exit code 3 for malicious tools
        #[arg(long)]
        no_fail_on_malicious: bool,

        /// OpenAI API key (or set OPENAI_API_KEY)
        #[arg(long)]
        openai_api_key: Option<String>,

        /// Print tool definitions in OpenAI function-calling format, no analysis
        #[arg(long)]
        openai_format: bool,
    },

    /// Sync upstream MCP registries into catalog tracking issues
    Sync {
        /// Classify only; create no issues and write no state
        #[arg(long)]
        dry_run: bool,
    },

    /// LLM analysis of MCP tool changes between two package versions
    DiffTools {
        /// Tool listing JSON for the old version
        old_json: PathBuf,
        /// Tool listing JSON for the new version
        new_json: PathBuf,
        /// Package name
        package: String,
        /// Old version string
        old_version: String,
        /// New version string
        new_version: String,
    },

    /// Report env-var requirements declared in a package's catalog manifest
    EnvCheck {
        /// Package name (e.g. digitalocean, playwright)
        package: String,

        /// Directory holding the catalog YAML manifests
        #[arg(long)]
        catalog_root: Option<PathBuf>,
    },
}

/// Severity threshold choices for `lint --fail-on`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    Low,
    Medium,
    High,
    Unknown,
}

impl From<FailOn> for Severity {
    fn from(fail_on: FailOn) -> Self {
        match fail_on {
            FailOn::Low => Severity::Low,
            FailOn::Medium => Severity::Medium,
            FailOn::High => Severity::High,
            FailOn::Unknown => Severity::Unknown,
        }
    }
}
