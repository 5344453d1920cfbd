//! CLI entrypoint for dual-counsel
//!
//! This is the main binary that wires together all layers using
//! dependency injection: config → provider adapters → consensus engine.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use counsel_application::{ConsensusEngine, ConsensusRequest};
use counsel_infrastructure::{ConfigLoader, JsonlAuditLogger, OpenAiCompatModel};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dual-counsel",
    version,
    about = "Ask two LLM providers the same legal question and reconcile their answers"
)]
struct Cli {
    /// The question to ask
    question: String,

    /// System instruction sent to both providers
    #[arg(long)]
    system: Option<String>,

    /// Sampling temperature (default from config)
    #[arg(long)]
    temperature: Option<f64>,

    /// Output token budget (default from config)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Explicit config file (highest priority)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip config file discovery and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Full)]
    output: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Final answer plus a consensus summary footer
    Full,
    /// Final answer only
    Answer,
    /// The whole consensus result as JSON
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!(e))
            .context("failed to load configuration")?
    };

    info!(
        primary = %config.providers.primary.name,
        secondary = %config.providers.secondary.name,
        "starting dual-counsel"
    );

    // === Dependency Injection ===
    let primary = Arc::new(OpenAiCompatModel::new(config.providers.primary.to_settings()));
    let secondary = Arc::new(OpenAiCompatModel::new(
        config.providers.secondary.to_settings(),
    ));
    let engine = ConsensusEngine::new(primary, secondary);

    let mut request = ConsensusRequest::new(cli.question)
        .with_temperature(cli.temperature.unwrap_or(config.engine.temperature))
        .with_max_tokens(cli.max_tokens.unwrap_or(config.engine.max_tokens));
    if let Some(system) = cli.system {
        request = request.with_system_prompt(system);
    }

    let result = engine.get_consensus_response(request).await?;

    if config.audit.enabled
        && let Some(logger) = JsonlAuditLogger::new(&config.audit.path)
    {
        logger.record(&result);
    }

    match cli.output {
        OutputFormat::Answer => {
            println!("{}", result.final_content);
        }
        OutputFormat::Full => {
            println!("{}", result.final_content);
            println!();
            println!(
                "consensus: {} | confidence: {:.2} | similarity: {:.2} | {:.1}s ({} / {})",
                result.consensus_method,
                result.consensus_confidence,
                result.similarity_score,
                result.total_time,
                result.primary_response.model_name,
                result.secondary_response.model_name,
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
