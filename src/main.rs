use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use mcpops::cli::{Cli, Commands, FailOn};
use mcpops::config::Config;
use mcpops::envcheck::{self, EnvCheckOutcome};
use mcpops::github::GithubClient;
use mcpops::lint::{self, LintOptions, LintOutcome};
use mcpops::llm::{LlmClient, OpenAiClient, OpenAiConfig};
use mcpops::{diff, sync};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mcpops")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("mcpops.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn openai_config(model: &str, config: &Config) -> OpenAiConfig {
    OpenAiConfig {
        model: model.to_string(),
        timeout: Duration::from_millis(config.llm.timeout_ms),
        ..Default::default()
    }
}

async fn run_application(cli: &Cli, config: &Config) -> Result<ExitCode> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Lint {
            paths,
            json,
            fail_on,
            fail_on_malicious,
            no_fail_on_malicious,
            openai_api_key,
            openai_format,
        } => {
            handle_lint(
                config,
                paths.clone(),
                json.clone(),
                *fail_on,
                *fail_on_malicious || !*no_fail_on_malicious,
                openai_api_key.clone(),
                *openai_format,
            )
            .await
        }
        Commands::Sync { dry_run } => handle_sync(config, *dry_run).await,
        Commands::DiffTools {
            old_json,
            new_json,
            package,
            old_version,
            new_version,
        } => handle_diff(config, old_json, new_json, package, old_version, new_version).await,
        Commands::EnvCheck { package, catalog_root } => {
            handle_env_check(config, package, catalog_root.as_deref())
        }
    }
}

async fn handle_lint(
    config: &Config,
    paths: Vec<PathBuf>,
    json_out: Option<PathBuf>,
    fail_on: FailOn,
    fail_on_malicious: bool,
    openai_api_key: Option<String>,
    openai_format: bool,
) -> Result<ExitCode> {
    info!("Linting {} path(s)", paths.len());

    let options = LintOptions {
        paths,
        json_out,
        fail_on: fail_on.into(),
        fail_on_malicious,
        openai_format,
    };

    // Format-only mode needs no credentials
    let llm = if openai_format {
        None
    } else {
        let client_config = openai_config(&config.llm.lint_model, config);
        let client = match openai_api_key {
            Some(key) => OpenAiClient::with_api_key(key, client_config),
            None => OpenAiClient::new(client_config),
        };
        match client {
            Ok(client) => Some(client),
            Err(_) => {
                eprintln!(
                    "{} An OpenAI API key is required for security analysis. Use --openai-api-key or set OPENAI_API_KEY.",
                    "ERROR:".red()
                );
                eprintln!("       Or use --openai-format to only convert tools without analysis.");
                return Ok(ExitCode::from(1));
            }
        }
    };

    let outcome = lint::run(
        &options,
        llm.as_ref().map(|client| client as &dyn LlmClient),
        &config.llm.lint_model,
    )
    .await?;

    Ok(match outcome {
        LintOutcome::Clean => ExitCode::SUCCESS,
        LintOutcome::ThresholdExceeded => ExitCode::from(2),
        LintOutcome::MaliciousDetected => ExitCode::from(3),
    })
}

async fn handle_sync(config: &Config, dry_run: bool) -> Result<ExitCode> {
    info!("Starting registry sync (dry_run: {})", dry_run);

    let github = GithubClient::new(&config.github.token_env)
        .context("GitHub token is required for the sync workflow")?;
    let llm = OpenAiClient::new(openai_config(&config.llm.judge_model, config))
        .context("OpenAI API key is required for the sync workflow")?;

    sync::workflow::run(config, &github, &llm, dry_run).await?;
    Ok(ExitCode::SUCCESS)
}

async fn handle_diff(
    config: &Config,
    old_json: &Path,
    new_json: &Path,
    package: &str,
    old_version: &str,
    new_version: &str,
) -> Result<ExitCode> {
    info!("Analyzing tool changes for {} {} -> {}", package, old_version, new_version);

    let llm = match OpenAiClient::new(openai_config(&config.llm.diff_model, config)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("AI analysis failed: {}", e);
            return Ok(ExitCode::from(1));
        }
    };

    match diff::run(
        &llm,
        &config.llm.diff_model,
        old_json,
        new_json,
        package,
        old_version,
        new_version,
    )
    .await
    {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("AI analysis failed: {}", e);
            Ok(ExitCode::from(1))
        }
    }
}

fn handle_env_check(config: &Config, package: &str, catalog_root: Option<&Path>) -> Result<ExitCode> {
    info!("Checking env requirements for {}", package);

    let root = catalog_root.unwrap_or(config.envcheck.catalog_root.as_path());
    let outcome = envcheck::run(root, package)?;

    Ok(match outcome {
        EnvCheckOutcome::Ok => ExitCode::SUCCESS,
        EnvCheckOutcome::MissingVars => ExitCode::from(1),
        EnvCheckOutcome::NotFound => ExitCode::from(2),
    })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the selected subcommand
    run_application(&cli, &config).await
}
