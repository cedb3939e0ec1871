// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Confab workspace: conversation turns,
//! structured option cards, and generation parameters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used in provider message arrays.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable recommendation surfaced in a structured reply.
///
/// `pros` and `cons` are flat string lists; the lenient decode tier is
/// responsible for flattening nested arrays before constructing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionCard {
    pub title: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

/// One exchange unit in a conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,

    /// Display-ready text shown to the user.
    pub text: String,

    /// The provider-returned content kept verbatim. Set only on assistant
    /// turns; re-sent in place of `text` when building conversation history
    /// so the model sees its own prior structured output, not the rendering.
    pub raw_payload: Option<String>,

    /// Present only when structured decoding of this turn succeeded.
    pub options: Option<Vec<OptionCard>>,

    /// Marks that structured decoding failed and `text` is the raw fallback.
    pub is_decode_error: bool,

    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// A user turn carrying the typed text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            raw_payload: None,
            options: None,
            is_decode_error: false,
            timestamp: Utc::now(),
        }
    }

    /// A plain assistant turn with no structured payload.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            raw_payload: None,
            options: None,
            is_decode_error: false,
            timestamp: Utc::now(),
        }
    }

    /// An assistant turn produced by the response decoder.
    pub fn decoded(
        text: impl Into<String>,
        raw_payload: impl Into<String>,
        options: Option<Vec<OptionCard>>,
        is_decode_error: bool,
    ) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            raw_payload: Some(raw_payload.into()),
            options,
            is_decode_error,
            timestamp: Utc::now(),
        }
    }

    /// A synthetic assistant turn carrying error text. The conversation stays
    /// usable; this is how transport and envelope failures surface inline.
    pub fn assistant_error(text: impl Into<String>) -> Self {
        Self::assistant(text)
    }

    /// The content to re-send as conversation history for this turn.
    pub fn history_content(&self) -> &str {
        match self.role {
            Role::Assistant => self.raw_payload.as_deref().unwrap_or(&self.text),
            _ => &self.text,
        }
    }
}

/// How the provider is asked to shape the assistant's content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text, no format constraint sent.
    Text,
    /// Request a JSON object (`response_format.type = "json_object"`).
    #[default]
    JsonObject,
}

/// Per-conversation generation parameters.
///
/// Constructed once per variant; `temperature` may be mutated live between
/// turns via the controller, everything else is fixed for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature, clamped to 0.0..=1.0.
    #[serde(default)]
    pub temperature: f64,

    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Provider-specific reasoning toggle (`thinking.type`).
    #[serde(default)]
    pub thinking_enabled: bool,

    /// Requested shape of the assistant content.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_model() -> String {
    "glm-4.5-flash".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            thinking_enabled: false,
            response_format: ResponseFormat::default(),
        }
    }
}

impl GenerationConfig {
    /// Sets the temperature, clamping to the valid 0.0..=1.0 range.
    pub fn set_temperature(&mut self, value: f64) {
        self.temperature = value.clamp(0.0, 1.0);
    }
}
