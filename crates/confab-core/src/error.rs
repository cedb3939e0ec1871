// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Confab conversation engine.

use thiserror::Error;

/// The primary error type used across the Confab workspace.
///
/// Content-level decode failures are deliberately absent: the response
/// decoder degrades through fallback tiers and always yields a renderable
/// [`Turn`](crate::types::Turn) instead of an error.
#[derive(Debug, Error)]
pub enum ConfabError {
    /// Configuration errors (invalid TOML, missing API key, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failures before any payload is available: network unreachable,
    /// TLS failure, timeout, or a non-2xx HTTP status.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider returned a well-formed HTTP response whose envelope is
    /// unparseable, empty, or carries a top-level `error` object. The message
    /// is the provider's own when one was present.
    #[error("provider envelope error: {message}")]
    Envelope { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConfabError {
    /// Shorthand for a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        ConfabError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for an envelope payload error.
    pub fn envelope(message: impl Into<String>) -> Self {
        ConfabError::Envelope {
            message: message.into(),
        }
    }
}
