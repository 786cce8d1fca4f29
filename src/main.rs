//! Folio CLI entry point.

use anyhow::Result;
use clap::Parser;
use folio::cli::{commands, Cli, Commands};
use folio::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("folio={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Config and doctor report problems themselves; everything else needs valid settings.
    match &cli.command {
        Commands::Config { action } => {
            return commands::run_config(action, config_path, settings);
        }
        Commands::Doctor => {
            return commands::run_doctor(config_path, &settings).await;
        }
        _ => settings.validate()?,
    }

    // Execute command
    match &cli.command {
        Commands::Serve {
            startup,
            host,
            port,
        } => {
            commands::run_serve(startup, host.clone(), *port, settings).await?;
        }

        Commands::Chat { startup } => {
            commands::run_chat(startup, settings).await?;
        }

        Commands::Ask { question, startup } => {
            commands::run_ask(question, startup, settings).await?;
        }

        Commands::Search { query, top_k } => {
            commands::run_search(query, *top_k, settings).await?;
        }

        Commands::Index { pdf_dir, reset } => {
            commands::run_index(pdf_dir.clone(), *reset, settings).await?;
        }

        Commands::Doctor | Commands::Config { .. } => {}
    }

    Ok(())
}
