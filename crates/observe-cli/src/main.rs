#![forbid(unsafe_code)]

//! Dialogue Observe CLI
//!
//! Runs a conversation between two models on an OpenAI-compatible server,
//! with a third model commenting, and prints it as it happens.

mod cli;
mod config;
mod config_handlers;
mod console;

use anyhow::{Context, Result};
use clap::Parser;
use observe_core::llm::{LlmProvider, MockLlmProvider, OpenAiCompatProvider, RetryWrapper};
use observe_core::Transcript;
use observe_dialogue::{DialogueInput, DialogueOrchestrator, write_transcript};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::{Cli, Command, RunArgs};
use crate::config::ObserveConfig;
use crate::console::ConsoleObserver;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run(args) => run(cli.config.as_deref(), &args).await,
        Command::Models { base_url } => models(cli.config.as_deref(), base_url).await,
        Command::Config { action } => {
            config_handlers::handle_config_command(cli.config.as_deref(), action)?;
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,observe=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(config_path: Option<&str>, args: &RunArgs) -> Result<()> {
    let mut config = ObserveConfig::load(config_path)?;
    args.apply(&mut config);
    config.validate()?;

    let llm: Arc<dyn LlmProvider> = if args.mock {
        tracing::info!("Using mock LLM provider");
        Arc::new(MockLlmProvider::with_response(
            "That is a fine question, and the answer depends on what we mean by it.",
        ))
    } else {
        let provider = server(&config, None)?;
        tracing::info!(base_url = provider.base_url(), "Using OpenAI-compatible server");
        Arc::new(
            RetryWrapper::new(Arc::new(provider)).with_policy(
                config.endpoint.max_retries,
                Duration::from_millis(config.endpoint.retry_delay_ms),
            ),
        )
    };

    let mut orchestrator = DialogueOrchestrator::new(llm, config.cast())
        .with_observer(Arc::new(ConsoleObserver::stdout()))
        .with_pace(Duration::from_millis(config.dialogue.pace_ms))
        .with_failure_policy(config.dialogue.on_error);

    let input = DialogueInput::new(&config.dialogue.topic)
        .with_rounds(config.dialogue.rounds)
        .with_commentary_frequency(config.dialogue.commentary_frequency);

    let outcome = orchestrator.run(input).await;

    // An aborted run still leaves a partial transcript behind.
    if let (Some(path), Some(transcript)) =
        (&config.output.transcript, orchestrator.last_transcript())
    {
        save_transcript(path, transcript)?;
    }

    outcome?;
    Ok(())
}

fn save_transcript(path: &Path, transcript: &Transcript) -> Result<()> {
    let format = write_transcript(path, transcript)
        .with_context(|| format!("writing transcript to {}", path.display()))?;
    println!("Transcript written to {} ({format:?})", path.display());
    Ok(())
}

async fn models(config_path: Option<&str>, base_url: Option<String>) -> Result<()> {
    let config = ObserveConfig::load(config_path)?;
    let provider = server(&config, base_url.as_deref())?;

    let models = provider
        .list_models()
        .await
        .with_context(|| format!("listing models at {}", provider.base_url()))?;
    if models.is_empty() {
        eprintln!("No models loaded at {}", provider.base_url());
    }
    for model in models {
        println!("{model}");
    }
    Ok(())
}

fn server(config: &ObserveConfig, base_url: Option<&str>) -> Result<OpenAiCompatProvider> {
    let url = base_url.unwrap_or(&config.endpoint.base_url);
    let mut provider = OpenAiCompatProvider::new(url)?
        .with_timeout(Duration::from_secs(config.endpoint.timeout_secs))?;
    if let Some(key) = &config.endpoint.api_key {
        provider = provider.with_api_key(key);
    }
    Ok(provider)
}
