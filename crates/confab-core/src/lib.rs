// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Confab conversation engine.
//!
//! This crate provides the conversation data model (turns, transcripts,
//! structured option cards, generation parameters), the error taxonomy, and
//! the abstract transport trait that the HTTP client crate implements.

pub mod error;
pub mod transcript;
pub mod transport;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ConfabError;
pub use transcript::Transcript;
pub use transport::{RawResponse, Transport};
pub use types::{GenerationConfig, OptionCard, ResponseFormat, Role, Turn};
