//! LLM-based security lint of MCP tool definitions.
//!
//! Scans catalog YAML files for tool definitions, sends each one to the
//! model for an LLM-attack-surface assessment, and maps the findings to
//! exit codes: 2 when the severity threshold is exceeded, 3 when any tool
//! is flagged malicious.

pub mod analysis;
pub mod report;
pub mod severity;
pub mod tools;

pub use analysis::{RiskAssessment, ToolReport};
pub use report::{FileReport, LintReport, collect_yaml_files};
pub use severity::{Severity, overall_severity};
pub use tools::{load_tools_from_yaml, to_openai_function, tools_in_doc};

use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::llm::LlmClient;

/// Options for one lint run
#[derive(Debug, Clone)]
pub struct LintOptions {
    pub paths: Vec<PathBuf>,
    pub json_out: Option<PathBuf>,
    pub fail_on: Severity,
    pub fail_on_malicious: bool,
    pub openai_format: bool,
}

/// How a lint run ended, for exit-code mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintOutcome {
    Clean,
    ThresholdExceeded,
    MaliciousDetected,
}

/// Run the linter. `llm` may be None only in `--openai-format` mode.
pub async fn run(options: &LintOptions, llm: Option<&dyn LlmClient>, model: &str) -> Result<LintOutcome> {
    let files = collect_yaml_files(&options.paths);

    if options.openai_format {
        print_openai_format(&files);
        return Ok(LintOutcome::Clean);
    }

    let Some(llm) = llm else {
        return Err(crate::McpOpsError::Llm(
            "An OpenAI client is required outside --openai-format mode".to_string(),
        ));
    };

    let mut reports = Vec::new();
    for file in &files {
        let label = file.display().to_string();
        let report = match lint_file(llm, model, file).await {
            Ok(report) => report,
            Err(e) => FileReport::failed(label, e.to_string()),
        };
        reports.push(report);
    }

    let report = LintReport { reports };
    report.print_console();

    if let Some(path) = &options.json_out {
        report.write_json(path)?;
        log::info!("Wrote JSON report to {}", path.display());
    }

    let malicious = report.malicious_tools();
    if !malicious.is_empty() && options.fail_on_malicious {
        use colored::*;
        println!("\n{} {} malicious tool(s) detected:", "DANGER:".red().bold(), malicious.len());
        for label in &malicious {
            println!("   - {}", label);
        }
        return Ok(LintOutcome::MaliciousDetected);
    }

    if report.worst_severity() >= options.fail_on {
        return Ok(LintOutcome::ThresholdExceeded);
    }

    Ok(LintOutcome::Clean)
}

/// Lint one file: load its tools, assess each, roll up the severity
async fn lint_file(llm: &dyn LlmClient, model: &str, path: &PathBuf) -> Result<FileReport> {
    let label = path.display().to_string();
    let content = fs::read_to_string(path)?;
    let tool_definitions = load_tools_from_yaml(&content)?;

    if tool_definitions.is_empty() {
        return Ok(FileReport::empty(label));
    }

    let mut tool_reports = Vec::new();
    for tool in &tool_definitions {
        tool_reports.push(analysis::analyze_tool(llm, model, tool).await);
    }

    let severities: Vec<Severity> = tool_reports.iter().map(|t| t.severity).collect();
    Ok(FileReport::new(label, overall_severity(&severities), tool_reports))
}

/// Print every tool in OpenAI function-calling format, no analysis
fn print_openai_format(files: &[PathBuf]) {
    println!("\n=== TOOLS IN OPENAI FORMAT ===");
    for file in files {
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Skipping {}: {}", file.display(), e);
                continue;
            }
        };
        let tool_definitions = match load_tools_from_yaml(&content) {
            Ok(tools) => tools,
            Err(e) => {
                log::warn!("Skipping {}: {}", file.display(), e);
                continue;
            }
        };

        println!("\n== {} ==", file.display());
        for tool in &tool_definitions {
            let converted = to_openai_function(tool);
            match serde_json::to_string_pretty(&converted) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Could not render tool: {}", e),
            }
        }
    }
}
