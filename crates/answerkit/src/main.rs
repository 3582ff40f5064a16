// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Answerkit - embeddable Q&A widgets over your own content.
//!
//! Binary entry point: serves the widget API and provides admin tooling for
//! bots, content ingestion, and widget tokens.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use answerkit_config::AnswerkitConfig;

/// Answerkit - embeddable Q&A widgets over your own content.
#[derive(Parser, Debug)]
#[command(name = "answerkit", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (defaults to the layered search path).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the widget API server.
    Serve,
    /// Manage bots.
    Bot {
        #[command(subcommand)]
        command: admin::BotCommands,
    },
    /// Ingest a content passage for a bot.
    Ingest {
        /// Bot to attach the passage to.
        bot_id: String,
        /// Passage text.
        text: String,
        /// Optional heading used in citations.
        #[arg(long)]
        heading: Option<String>,
    },
    /// Manage widget tokens.
    Token {
        #[command(subcommand)]
        command: admin::TokenCommands,
    },
}

fn load_config(path: Option<&str>) -> AnswerkitConfig {
    let result = match path {
        Some(path) => answerkit_config::load_config_from_path(std::path::Path::new(path)),
        None => answerkit_config::load_config(),
    };
    match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("answerkit: {e}");
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let result = match cli.command {
        Commands::Serve => serve::run(config).await,
        Commands::Bot { command } => admin::run_bot(config, command).await,
        Commands::Ingest {
            bot_id,
            text,
            heading,
        } => admin::run_ingest(config, bot_id, text, heading).await,
        Commands::Token { command } => admin::run_token(config, command).await,
    };

    if let Err(e) = result {
        eprintln!("answerkit: {e}");
        std::process::exit(1);
    }
}
