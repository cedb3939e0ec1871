// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Z.AI chat-completions provider layer for Confab.
//!
//! Contains the wire-format request/response envelope types, the pure
//! request builder that maps a [`Transcript`](confab_core::Transcript) into
//! a provider request, and the `reqwest`-backed [`ZaiClient`] transport.

pub mod builder;
pub mod client;
pub mod wire;

pub use builder::build_request;
pub use client::ZaiClient;
pub use wire::{parse_envelope, ChatRequest, ChatResponse};
