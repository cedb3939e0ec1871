// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Confab.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and the per-variant system prompt constants.

pub mod loader;
pub mod model;
pub mod prompts;
pub mod validation;

use confab_core::ConfabError;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ConfabConfig, ZaiConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point: Figment layering first, then
/// post-deserialization range validation, with all problems folded into one
/// [`ConfabError::Config`].
pub fn load_and_validate() -> Result<ConfabConfig, ConfabError> {
    let config = loader::load_config().map_err(|e| ConfabError::Config(e.to_string()))?;
    validation::validate_config(&config).map_err(|errors| ConfabError::Config(errors.join("; ")))?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<ConfabConfig, ConfabError> {
    let config =
        loader::load_config_from_str(toml_content).map_err(|e| ConfabError::Config(e.to_string()))?;
    validation::validate_config(&config).map_err(|errors| ConfabError::Config(errors.join("; ")))?;
    Ok(config)
}
