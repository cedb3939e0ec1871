// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as value ranges. All violations are collected instead of
//! failing fast.

use crate::model::ConfabConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected violations as human-readable messages.
pub fn validate_config(config: &ConfabConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.zai.base_url.trim().is_empty() {
        errors.push("zai.base_url must not be empty".to_string());
    } else if !config.zai.base_url.starts_with("http://")
        && !config.zai.base_url.starts_with("https://")
    {
        errors.push(format!(
            "zai.base_url `{}` must start with http:// or https://",
            config.zai.base_url
        ));
    }

    if config.zai.timeout_secs == 0 {
        errors.push("zai.timeout_secs must be greater than zero".to_string());
    }

    if config.generation.model.trim().is_empty() {
        errors.push("generation.model must not be empty".to_string());
    }

    if !(0.0..=1.0).contains(&config.generation.temperature) {
        errors.push(format!(
            "generation.temperature must be within 0.0..=1.0, got {}",
            config.generation.temperature
        ));
    }

    if config.generation.max_tokens == 0 {
        errors.push("generation.max_tokens must be greater than zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
