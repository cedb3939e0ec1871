// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Z.AI chat-completions API.
//!
//! Provides [`ZaiClient`], the concrete [`Transport`] implementation:
//! bearer-token auth, JSON POST, fixed request timeout. Failures and
//! non-2xx statuses surface as [`ConfabError::Transport`] without any
//! payload decoding; the upstream behavior left the timeout unspecified,
//! so 30 seconds is the documented default and there is no automatic retry.

use std::time::Duration;

use async_trait::async_trait;
use confab_core::{ConfabError, RawResponse, Transport};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::wire::ApiError;

/// Base URL for the Z.AI chat-completions endpoint.
const API_BASE_URL: &str = "https://api.z.ai/api/paas/v4/chat/completions";

/// Default request timeout. The upstream transport enforced none of its own.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for Z.AI API communication.
#[derive(Debug, Clone)]
pub struct ZaiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ZaiClient {
    /// Creates a new client with the default endpoint and 30s timeout.
    ///
    /// The API key becomes a default `Authorization: Bearer` header; it is
    /// never logged.
    pub fn new(api_key: &str) -> Result<Self, ConfabError> {
        Self::with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client with an explicit request timeout.
    pub fn with_timeout(api_key: &str, timeout: Duration) -> Result<Self, ConfabError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ConfabError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ConfabError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the endpoint URL, for configuration or tests.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }
}

#[async_trait]
impl Transport for ZaiClient {
    async fn post_json(&self, body: serde_json::Value) -> Result<RawResponse, ConfabError> {
        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ConfabError::Transport {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "completion response received");

        let text = response.text().await.map_err(|e| ConfabError::Transport {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            // A failed status often still carries an envelope-shaped error
            // body; surface the provider's message when it does.
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(ErrorBody {
                    error: Some(api_err),
                }) => format!("API returned {status}: {}", api_err.message),
                _ => format!("API returned {status}: {text}"),
            };
            return Err(ConfabError::transport(message));
        }

        Ok(RawResponse {
            status: status.as_u16(),
            body: text,
        })
    }
}

/// Minimal shape for extracting `error.message` from a failed-status body.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ApiError>,
}
