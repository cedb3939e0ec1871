// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confab - a conversational consultant over a chat-completions endpoint.
//!
//! This is the binary entry point. The conversation logic lives in
//! `confab-chat`; this crate only wires configuration, the HTTP client, and
//! the terminal front-end together.

mod chat;
mod country;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use confab_config::model::ConfabConfig;
use confab_core::ConfabError;
use confab_zai::ZaiClient;
use tracing_subscriber::EnvFilter;

/// Confab - a conversational consultant over a chat-completions endpoint.
#[derive(Parser, Debug)]
#[command(name = "confab", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (otherwise the XDG hierarchy).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the interactive consultant chat.
    Chat,
    /// Look up structured information about a country.
    Country {
        /// Country name to validate and look up.
        name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Chat => chat::run_chat(&config).await,
        Commands::Country { name } => country::run_country(&config, &name).await,
    };

    if let Err(err) = result {
        eprintln!("{} {err}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ConfabConfig, ConfabError> {
    match path {
        Some(path) => {
            let config = confab_config::load_config_from_path(path)
                .map_err(|e| ConfabError::Config(e.to_string()))?;
            confab_config::validation::validate_config(&config)
                .map_err(|errors| ConfabError::Config(errors.join("; ")))?;
            Ok(config)
        }
        None => confab_config::load_and_validate(),
    }
}

/// Builds the HTTP client from configuration.
///
/// The API key comes from config or `CONFAB_ZAI_API_KEY`; its absence is a
/// startup error, not a mid-conversation one.
fn build_client(config: &ConfabConfig) -> Result<ZaiClient, ConfabError> {
    let api_key = config.zai.api_key.as_deref().ok_or_else(|| {
        ConfabError::Config(
            "API key required: set zai.api_key in confab.toml or CONFAB_ZAI_API_KEY".into(),
        )
    })?;
    Ok(
        ZaiClient::with_timeout(api_key, Duration::from_secs(config.zai.timeout_secs))?
            .with_base_url(config.zai.base_url.clone()),
    )
}
