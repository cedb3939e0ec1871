// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The abstract transport seam between the conversation core and HTTP.
//!
//! The core only needs "POST a JSON body, get a status and a body back".
//! The concrete client lives in `confab-zai`; tests substitute an in-memory
//! implementation.

use async_trait::async_trait;

use crate::error::ConfabError;

/// A raw provider response: HTTP status plus the unparsed body text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one JSON POST to the completion endpoint.
///
/// Implementations return `Ok` only for a 2xx status; transport-level
/// failures (network unreachable, timeout, TLS) and non-success statuses are
/// [`ConfabError::Transport`]. The caller never attempts payload decoding on
/// a transport error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, body: serde_json::Value) -> Result<RawResponse, ConfabError>;
}
