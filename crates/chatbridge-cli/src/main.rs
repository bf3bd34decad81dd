//! # chatbridge
//!
//! Command-line harness for the translator: reads a dump of Chat Completions
//! chunks and writes the equivalent Responses stream events to stdout.

#![deny(unsafe_code)]

mod input;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chatbridge_core::Response;
use chatbridge_settings::{BridgeSettings, OutputFormat};
use chatbridge_stream::{TranslatorOptions, translate_stream};
use clap::{Args, Parser, Subcommand};
use tokio::io::AsyncRead;
use uuid::Uuid;

/// Chat Completions → Responses stream translator.
#[derive(Parser, Debug)]
#[command(name = "chatbridge", version, about = "Chat Completions to Responses stream translator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a chunk dump (JSON lines or raw SSE) into Responses events.
    Translate(TranslateArgs),
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Chunk file to read (stdin if omitted).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Model name for the response shell (overrides settings).
    #[arg(long)]
    model: Option<String>,

    /// Response id (generated if omitted).
    #[arg(long)]
    response_id: Option<String>,

    /// Output framing: `ndjson` or `sse` (overrides settings).
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Settings file (defaults to `~/.chatbridge/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn parse_format(value: &str) -> std::result::Result<OutputFormat, String> {
    OutputFormat::parse(value).ok_or_else(|| format!("unknown format '{value}', expected ndjson or sse"))
}

fn load_settings(path: Option<&PathBuf>) -> Result<BridgeSettings> {
    let path = path.cloned().unwrap_or_else(chatbridge_settings::settings_path);
    chatbridge_settings::load_settings_from_path(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

fn response_shell(args: &TranslateArgs, settings: &BridgeSettings) -> Response {
    let id = args
        .response_id
        .clone()
        .unwrap_or_else(|| format!("resp_{}", Uuid::now_v7().simple()));
    let model = args
        .model
        .clone()
        .unwrap_or_else(|| settings.response.model.clone());
    Response::in_progress(id, model, chrono::Utc::now().timestamp())
}

async fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
    match path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input: {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(tokio::io::stdin())),
    }
}

async fn translate(args: TranslateArgs) -> Result<()> {
    let settings = load_settings(args.settings.as_ref())?;
    chatbridge_core::logging::init_subscriber(&settings.logging.level, settings.logging.format);
    tracing::debug!(?settings, "settings resolved");

    let format = args.format.unwrap_or(settings.output.format);
    let response = response_shell(&args, &settings);
    let options = TranslatorOptions::with_item_id(settings.stream.placeholder_item_id.clone());
    tracing::info!(response_id = %response.id, model = %response.model, ?format, "translating");

    let reader = open_input(args.input.as_ref()).await?;
    let events = translate_stream(response, input::chunk_stream(reader), options);

    let mut stdout = tokio::io::stdout();
    let written = output::write_events(events, format, &mut stdout).await?;
    tracing::debug!(events = written, "translation finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Translate(args) => translate(args).await,
    }
}
