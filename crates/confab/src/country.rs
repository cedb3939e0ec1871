// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `confab country` command implementation.
//!
//! One-shot flow: validate that the input names a country, then look it up
//! and render the structured record. Both steps are single round trips with
//! no conversation state.

use colored::Colorize;
use confab_chat::{parse_country_info, parse_validation};
use confab_config::model::ConfabConfig;
use confab_config::prompts;
use confab_core::{ConfabError, GenerationConfig, Transcript, Transport, Turn};
use confab_zai::wire::{parse_envelope, ChatResponse};
use confab_zai::{build_request, ZaiClient};
use tracing::debug;

/// Runs the country validation + lookup flow.
pub async fn run_country(config: &ConfabConfig, name: &str) -> Result<(), ConfabError> {
    let client = crate::build_client(config)?;

    debug!(name, "validating country name");
    let response = one_shot(&client, prompts::COUNTRY_VALIDATION, name, &config.generation).await?;
    if !parse_validation(&response) {
        println!(
            "{} \"{name}\" does not look like the name of a country.",
            "!".yellow().bold()
        );
        return Ok(());
    }

    debug!(name, "fetching country info");
    let response = one_shot(&client, prompts::COUNTRY_INFO, name, &config.generation).await?;
    match parse_country_info(&response) {
        Some(info) => {
            println!("{}", info.render());
        }
        None => {
            // The model ignored the schema; show what it said instead of
            // discarding the reply.
            println!("{}", "could not map the reply to a country record:".yellow());
            println!("{}", response.first_content().unwrap_or_default());
        }
    }

    Ok(())
}

/// One request/response round trip with a single user message.
async fn one_shot(
    client: &ZaiClient,
    system_prompt: &str,
    user_text: &str,
    generation: &GenerationConfig,
) -> Result<ChatResponse, ConfabError> {
    // The builder skips the transcript's greeting element, so a throwaway
    // greeting keeps the one-shot path on the same code as the chat loop.
    let mut transcript = Transcript::new(Turn::assistant(String::new()));
    transcript.push(Turn::user(user_text));

    let request = build_request(&transcript, generation, system_prompt);
    let body = serde_json::to_value(&request)
        .map_err(|e| ConfabError::Internal(format!("request serialization failed: {e}")))?;
    let raw = client.post_json(body).await?;
    parse_envelope(&raw.body)
}
