// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds a provider request from a transcript and generation parameters.

use confab_core::{GenerationConfig, ResponseFormat, Role, Transcript};

use crate::wire::{ChatRequest, Thinking, WireMessage, WireResponseFormat};

/// Turns a transcript plus configuration into a chat-completions request.
///
/// Pure function of its inputs:
/// - a system-role message carrying `system_prompt` comes first;
/// - every transcript turn except the synthesized greeting follows in order,
///   with assistant turns re-sending their raw provider payload (when
///   present) instead of the rendered text, so the model sees its own prior
///   structured output as context.
pub fn build_request(
    transcript: &Transcript,
    config: &GenerationConfig,
    system_prompt: &str,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(transcript.len());
    messages.push(WireMessage {
        role: Role::System.as_str().to_string(),
        content: system_prompt.to_string(),
    });

    for turn in transcript.history() {
        messages.push(WireMessage {
            role: turn.role.as_str().to_string(),
            content: turn.history_content().to_string(),
        });
    }

    ChatRequest {
        model: config.model.clone(),
        messages,
        thinking: Thinking::enabled(config.thinking_enabled),
        response_format: match config.response_format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(WireResponseFormat {
                type_: "json_object".to_string(),
            }),
        },
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    }
}
