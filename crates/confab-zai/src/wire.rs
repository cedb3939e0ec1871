// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request and response envelope types for the Z.AI chat-completions API.
//!
//! Every response field carries `#[serde(default)]`: the envelope is only
//! nominally stable and partial payloads must still deserialize. The inner
//! `choices[].message.content` string is model-generated and handled
//! separately by the layered decoder in `confab-chat`.

use confab_core::ConfabError;
use serde::{Deserialize, Serialize};

// --- Request types ---

/// Provider-specific reasoning toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thinking {
    /// `"enabled"` or `"disabled"`.
    #[serde(rename = "type")]
    pub type_: String,
}

impl Thinking {
    pub fn enabled(on: bool) -> Self {
        Self {
            type_: if on { "enabled" } else { "disabled" }.to_string(),
        }
    }
}

/// Forced response format hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireResponseFormat {
    /// Format type (e.g., "json_object").
    #[serde(rename = "type")]
    pub type_: String,
}

/// One message in the outbound `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

/// A chat-completions request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub thinking: Thinking,
    #[serde(rename = "response_format", skip_serializing_if = "Option::is_none")]
    pub response_format: Option<WireResponseFormat>,
    #[serde(rename = "max_tokens")]
    pub max_tokens: u32,
    pub temperature: f64,
}

// --- Response types ---

/// The assistant message inside a choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "reasoning_content")]
    pub reasoning_content: Option<String>,
    #[serde(default)]
    pub role: String,
}

/// One completion choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default, rename = "finish_reason")]
    pub finish_reason: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub message: ResponseMessage,
}

/// Prompt-token cache breakdown.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptTokensDetails {
    #[serde(default, rename = "cached_tokens")]
    pub cached_tokens: u32,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    #[serde(default, rename = "completion_tokens")]
    pub completion_tokens: u32,
    #[serde(default, rename = "prompt_tokens")]
    pub prompt_tokens: u32,
    #[serde(default, rename = "prompt_tokens_details")]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
    #[serde(default, rename = "total_tokens")]
    pub total_tokens: u32,
}

/// Top-level provider error object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// The full chat-completions response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, rename = "request_id")]
    pub request_id: String,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl ChatResponse {
    /// The model-generated content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Parses a 2xx body into a [`ChatResponse`] and rejects degenerate envelopes.
///
/// Fails with [`ConfabError::Envelope`] when the body is not a valid
/// envelope, when the provider reports a top-level `error` object (the
/// provider's message is surfaced verbatim), or when `choices` is empty.
pub fn parse_envelope(body: &str) -> Result<ChatResponse, ConfabError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ConfabError::envelope(format!("unparseable response envelope: {e}")))?;

    if let Some(ref err) = response.error {
        tracing::warn!(
            error_type = %err.type_,
            code = err.code.as_deref().unwrap_or("-"),
            "provider returned an error envelope"
        );
        return Err(ConfabError::envelope(err.message.clone()));
    }

    if response.choices.is_empty() {
        return Err(ConfabError::envelope("response contained no choices"));
    }

    Ok(response)
}
