// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `confab chat` command implementation.
//!
//! Runs a readline REPL against a spawned [`ChatController`]. Slash
//! commands cover the non-message intents: `/retry`, `/restart`,
//! `/temp <v>`, `/raw`, `/quit`.

use std::sync::Arc;

use colored::Colorize;
use confab_chat::{ChatController, ChatState, ConversationSpec, Intent};
use confab_config::model::ConfabConfig;
use confab_config::prompts;
use confab_core::{ConfabError, Role, Turn};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

/// Runs the interactive consultant chat.
pub async fn run_chat(config: &ConfabConfig) -> Result<(), ConfabError> {
    let client = crate::build_client(config)?;
    let spec = ConversationSpec {
        system_prompt: prompts::SALES_CONSULTANT.to_string(),
        greeting_json: prompts::INITIAL_GREETING.to_string(),
        fallback_greeting: prompts::FALLBACK_GREETING.to_string(),
        generation: config.generation.clone(),
    };
    let controller = ChatController::spawn(spec, Arc::new(client));

    let mut editor = DefaultEditor::new()
        .map_err(|e| ConfabError::Internal(format!("readline init failed: {e}")))?;

    // Print the greeting before the first prompt.
    let mut printed = 0;
    printed = render_new_turns(&controller.state(), printed);
    println!(
        "{}",
        "Commands: /retry /restart /temp <v> /raw /quit".dimmed()
    );

    loop {
        let line = match editor.readline(&"you> ".blue().bold().to_string()) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(ConfabError::Internal(format!("readline failed: {e}"))),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line);

        match line {
            "/quit" | "/exit" => break,
            "/restart" => {
                let state = dispatch(&controller, Intent::RestartConversation).await?;
                printed = 0;
                printed = render_new_turns(&state, printed);
            }
            "/retry" => {
                let state = dispatch(&controller, Intent::RetryLastMessage).await?;
                printed = render_new_turns(&state, printed);
            }
            "/raw" => match controller.state().turns.iter().rev().find_map(|t| {
                (t.role == Role::Assistant).then(|| t.raw_payload.clone()).flatten()
            }) {
                Some(raw) => println!("{raw}"),
                None => println!("{}", "no raw payload yet".dimmed()),
            },
            _ if line.starts_with("/temp") => {
                match line.trim_start_matches("/temp").trim().parse::<f64>() {
                    Ok(value) => {
                        let state = dispatch(&controller, Intent::UpdateTemperature(value)).await?;
                        println!("{}", format!("temperature = {}", state.temperature).dimmed());
                    }
                    Err(_) => println!("{}", "usage: /temp <0.0..=1.0>".dimmed()),
                }
            }
            _ => {
                let state = dispatch(&controller, Intent::SendMessage(line.to_string())).await?;
                printed = render_new_turns(&state, printed);
            }
        }
    }

    debug!("chat session ended");
    Ok(())
}

/// Submits an intent and waits for the controller to settle.
async fn dispatch(controller: &ChatController, intent: Intent) -> Result<ChatState, ConfabError> {
    let seq = controller.state().seq;
    controller.accept(intent);
    controller.settled_after(seq).await
}

/// Prints every turn not yet shown; returns the new printed count.
fn render_new_turns(state: &ChatState, printed: usize) -> usize {
    for turn in &state.turns[printed..] {
        render_turn(turn);
    }
    if let Some(ref error) = state.error {
        println!("{} {error}", "!".red().bold());
    }
    state.turns.len()
}

fn render_turn(turn: &Turn) {
    match turn.role {
        // The readline prompt already echoed the user's own text.
        Role::User => {}
        Role::Assistant | Role::System => {
            if turn.is_decode_error {
                println!("{} {}", "ai>".yellow().bold(), turn.text);
                println!("{}", "(unstructured reply; /retry to ask again)".dimmed());
            } else {
                println!("{} {}", "ai>".green().bold(), turn.text);
            }
            if let Some(ref options) = turn.options {
                for option in options {
                    println!("  {} {}", "*".green(), option.title.bold());
                    for pro in &option.pros {
                        println!("    {} {pro}", "+".green());
                    }
                    for con in &option.cons {
                        println!("    {} {con}", "-".red());
                    }
                }
            }
        }
    }
}
