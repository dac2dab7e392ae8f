//! Main entry point for the Custom Translator trainer CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use custom_translator_trainer::cli::commands::{self, Commands};
use custom_translator_trainer::{ErrorKind, TrainerError};

/// Custom Translator Trainer - train and use Custom Translator models
#[derive(Parser, Debug)]
#[command(name = "custom-translator-trainer", version, about, long_about = None)]
struct Args {
    /// Subscription key (optional, defaults to TRANSLATOR_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Workspace id (optional, defaults to WORKSPACE_ID env var)
    #[arg(long)]
    workspace_id: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("custom_translator_trainer={}", log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        std::env::set_var("TRANSLATOR_KEY", api_key);
    }
    if let Some(workspace_id) = args.workspace_id {
        std::env::set_var("WORKSPACE_ID", workspace_id);
    }

    // Training runs by default; translation has to be asked for explicitly
    let command = args.command.unwrap_or_default();

    if let Err(err) = commands::execute(command).await {
        match err.downcast_ref::<TrainerError>() {
            Some(trainer_err) if trainer_err.kind() == ErrorKind::HttpStatus => {
                eprintln!("\n❌ Service API error: {}", trainer_err);
                if let Some(body) = trainer_err.response_body() {
                    eprintln!("   Error details: {}", body);
                }
            }
            _ => eprintln!("❌ Unexpected error: {}", err),
        }
        std::process::exit(1);
    }

    Ok(())
}
