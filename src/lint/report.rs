//! Lint report assembly and rendering.

use colored::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::analysis::ToolReport;
use super::severity::Severity;
use crate::error::Result;

/// Verdict for one scanned file
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub overall_severity: Severity,
    pub tools: Vec<ToolReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// Report for a file that produced tool verdicts
    pub fn new(file: impl Into<String>, overall_severity: Severity, tools: Vec<ToolReport>) -> Self {
        Self {
            file: file.into(),
            overall_severity,
            tools,
            message: None,
            error: None,
        }
    }

    /// Report for a file with nothing to analyze
    pub fn empty(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            overall_severity: Severity::Info,
            tools: Vec::new(),
            message: Some("No tools found".to_string()),
            error: None,
        }
    }

    /// Report for a file that could not be read or parsed
    pub fn failed(file: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            overall_severity: Severity::Info,
            tools: Vec::new(),
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Full report over a lint run
#[derive(Debug, Serialize)]
pub struct LintReport {
    pub reports: Vec<FileReport>,
}

impl LintReport {
    /// Worst severity across all files (unknown outranks high here)
    pub fn worst_severity(&self) -> Severity {
        self.reports
            .iter()
            .map(|r| r.overall_severity)
            .max()
            .unwrap_or(Severity::Info)
    }

    /// `file:tool` labels for every tool the model flagged malicious
    pub fn malicious_tools(&self) -> Vec<String> {
        self.reports
            .iter()
            .flat_map(|report| {
                report
                    .tools
                    .iter()
                    .filter(|tool| tool.is_malicious())
                    .map(|tool| format!("{}:{}", report.file, tool.name))
            })
            .collect()
    }

    /// Write the full report as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Console summary, one block per file
    pub fn print_console(&self) {
        for report in &self.reports {
            println!("\n== {} ==", report.file);

            if let Some(error) = &report.error {
                println!("{} {}", "ERROR:".red(), error);
                continue;
            }

            if let Some(message) = &report.message {
                println!("{}", message);
                continue;
            }

            println!(
                "Overall Risk: {}",
                colorize_severity(report.overall_severity)
            );

            for tool in &report.tools {
                println!("\n  {}: {}", tool.name.bold(), colorize_severity(tool.severity));

                match &tool.assessment {
                    Some(assessment) => {
                        if assessment.is_malicious {
                            println!("     {}", "MALICIOUS".red().bold());
                        } else {
                            println!("     {}", "SAFE".green());
                        }
                        if !assessment.reasoning.is_empty() {
                            println!("     Reasoning: {}", assessment.reasoning);
                        }
                        if !assessment.concerns.is_empty() {
                            println!("     Security Concerns:");
                            for concern in &assessment.concerns {
                                println!("       - {}", concern);
                            }
                        }
                        if !assessment.recommendations.is_empty() {
                            println!("     Recommendations:");
                            for recommendation in &assessment.recommendations {
                                println!("       - {}", recommendation);
                            }
                        }
                    }
                    None => {
                        if let Some(error) = &tool.error {
                            println!("     {} {}", "Analysis Error:".red(), error);
                        } else {
                            println!("     {}", "No assessment available".yellow());
                        }
                    }
                }
            }
        }
    }
}

fn colorize_severity(severity: Severity) -> ColoredString {
    let label = severity.to_string().to_uppercase();
    match severity {
        Severity::High => label.red().bold(),
        Severity::Medium => label.yellow(),
        Severity::Low => label.cyan(),
        Severity::Unknown => label.magenta(),
        Severity::Info => label.green(),
    }
}

/// Expand the positional path arguments: directories are scanned
/// recursively for YAML files, plain paths pass through.
pub fn collect_yaml_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for extension in ["yml", "yaml"] {
                let pattern = format!("{}/**/*.{}", path.display(), extension);
                if let Ok(matches) = glob::glob(&pattern) {
                    files.extend(matches.flatten());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files
}
