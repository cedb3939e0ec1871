// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./confab.toml` > `~/.config/confab/confab.toml`
//! > `/etc/confab/confab.toml` with environment variable overrides via the
//! `CONFAB_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ConfabConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/confab/confab.toml` (system-wide)
/// 3. `~/.config/confab/confab.toml` (user XDG config)
/// 4. `./confab.toml` (local directory)
/// 5. `CONFAB_*` environment variables
pub fn load_config() -> Result<ConfabConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConfabConfig::default()))
        .merge(Toml::file("/etc/confab/confab.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("confab/confab.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("confab.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ConfabConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConfabConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ConfabConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ConfabConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")`: field names contain underscores,
/// so `CONFAB_ZAI_API_KEY` must map to `zai.api_key`, not `zai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CONFAB_").map(|key| {
        // `key` keeps the env var's original case, so lowercase before
        // mapping. Example: CONFAB_ZAI_API_KEY -> "zai_api_key" ->
        // "zai.api_key".
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("zai_", "zai.", 1)
            .replacen("generation_", "generation.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_config_overrides_defaults() {
        let config = load_config_from_str(
            r#"
            [zai]
            api_key = "sk-test"
            timeout_secs = 10

            [generation]
            temperature = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.zai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.zai.timeout_secs, 10);
        assert_eq!(config.generation.temperature, 0.5);
        // Untouched fields keep defaults.
        assert_eq!(config.generation.model, "glm-4.5-flash");
    }

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert!(config.zai.api_key.is_none());
        assert_eq!(config.generation.max_tokens, 4096);
    }

    #[test]
    fn env_vars_map_to_dotted_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CONFAB_ZAI_API_KEY", "sk-from-env");
            jail.set_env("CONFAB_GENERATION_MAX_TOKENS", "1024");

            let config: ConfabConfig = Figment::new()
                .merge(Serialized::defaults(ConfabConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.zai.api_key.as_deref(), Some("sk-from-env"));
            assert_eq!(config.generation.max_tokens, 1024);
            Ok(())
        });
    }

    // The exact remedy the CLI suggests for a missing key must work on its
    // own against a full default config, despite `deny_unknown_fields`.
    #[test]
    fn api_key_env_var_alone_is_accepted() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CONFAB_ZAI_API_KEY", "sk-only");

            let config: ConfabConfig = Figment::new()
                .merge(Serialized::defaults(ConfabConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.zai.api_key.as_deref(), Some("sk-only"));
            Ok(())
        });
    }
}
