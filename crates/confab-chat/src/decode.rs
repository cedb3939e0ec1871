// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered decoding of model-generated reply content.
//!
//! The provider's `choices[0].message.content` is nominally JSON of the
//! shape `{"message": ..., "options": [...]}` but the model routinely
//! deviates: arrays nested inside arrays, missing fields, prose instead of
//! JSON. Decoding therefore runs three tiers:
//!
//! 1. **Strict** -- the content parses directly into the target shape with
//!    plain string lists for `pros`/`cons`.
//! 2. **Lenient** -- `pros`/`cons` are reparsed as opaque JSON trees and
//!    flattened depth-first into string lists.
//! 3. **Raw fallback** -- the content is carried verbatim as display text,
//!    marked `is_decode_error`, so the caller always receives a renderable
//!    turn.
//!
//! All tiers preserve the original content as `raw_payload` so it can be
//! inspected and re-sent verbatim as conversation history.

use confab_core::{ConfabError, OptionCard, Turn};
use confab_zai::wire::{parse_envelope, ChatResponse};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// The strict target shape of a structured reply.
#[derive(Debug, Deserialize)]
struct ConsultantReply {
    message: String,
    #[serde(default)]
    options: Option<Vec<OptionCard>>,
}

/// Lenient shape: `pros`/`cons` as opaque trees, flattened afterwards.
#[derive(Debug, Deserialize)]
struct LenientReply {
    message: String,
    #[serde(default)]
    options: Option<Vec<LenientOption>>,
}

#[derive(Debug, Deserialize)]
struct LenientOption {
    title: String,
    #[serde(default)]
    pros: Option<Value>,
    #[serde(default)]
    cons: Option<Value>,
}

/// Flattens an arbitrarily nested JSON tree into its string leaves.
///
/// Depth-first, order-preserving: a string leaf is kept when non-blank, an
/// array recurses into its elements, every other leaf (number, bool, null,
/// object) is discarded.
pub fn flatten_strings(value: Option<&Value>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(value) = value {
        collect_strings(value, &mut out);
    }
    out
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            if !s.trim().is_empty() {
                out.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        _ => {}
    }
}

/// Resolves model-generated content into an assistant [`Turn`].
///
/// Never fails: the terminal raw-fallback tier guarantees a renderable turn
/// for any input whatsoever.
pub fn decode_content(content: &str) -> Turn {
    // Tier 1: strict.
    if let Ok(reply) = serde_json::from_str::<ConsultantReply>(content) {
        return Turn::decoded(reply.message, content, reply.options, false);
    }

    // Tier 2: lenient, tolerating nested pros/cons arrays.
    if let Ok(reply) = serde_json::from_str::<LenientReply>(content) {
        debug!("strict decode failed, lenient decode succeeded");
        let options = reply.options.map(|options| {
            options
                .into_iter()
                .map(|raw| OptionCard {
                    title: raw.title,
                    pros: flatten_strings(raw.pros.as_ref()),
                    cons: flatten_strings(raw.cons.as_ref()),
                })
                .collect()
        });
        return Turn::decoded(reply.message, content, options, false);
    }

    // Tier 3: raw fallback. The content is shown verbatim and flagged so the
    // caller can offer a manual retry.
    warn!(content, "structured decode failed, falling back to raw content");
    Turn::decoded(content, content, None, true)
}

/// Parses a raw provider body and resolves its first choice into a turn.
///
/// Envelope-level problems (unparseable body, provider `error` object, no
/// choices) are [`ConfabError::Envelope`]; content-level problems degrade
/// through [`decode_content`] and never fail.
pub fn decode_body(body: &str) -> Result<Turn, ConfabError> {
    let response = parse_envelope(body)?;
    log_usage(&response);

    let content = response.first_content().unwrap_or_default();
    Ok(decode_content(content))
}

fn log_usage(response: &ChatResponse) {
    debug!(
        id = %response.id,
        model = %response.model,
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        cached_tokens = response
            .usage
            .prompt_tokens_details
            .as_ref()
            .map_or(0, |d| d.cached_tokens),
        "envelope parsed"
    );
}
