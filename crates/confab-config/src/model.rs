// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup instead of silently ignoring typos.

use confab_core::GenerationConfig;
use serde::{Deserialize, Serialize};

/// Top-level Confab configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections default to sensible values; only the
/// API key has no default.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfabConfig {
    /// Z.AI endpoint settings.
    #[serde(default)]
    pub zai: ZaiConfig,

    /// Default generation parameters for a new conversation.
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Z.AI endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZaiConfig {
    /// API key. `None` requires the `CONFAB_ZAI_API_KEY` environment
    /// variable. Treated as an opaque secret; never logged.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat-completions endpoint URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. The upstream provider enforces no
    /// timeout of its own, so this is the only bound on a hung request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.z.ai/api/paas/v4/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ZaiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = ConfabConfig::default();
        assert!(config.zai.api_key.is_none());
        assert!(config.zai.base_url.starts_with("https://api.z.ai/"));
        assert_eq!(config.zai.timeout_secs, 30);
        assert_eq!(config.generation.model, "glm-4.5-flash");
        assert_eq!(config.generation.max_tokens, 4096);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = "[zai]\nnot_a_field = 1\n";
        let result: Result<ConfabConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
