// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation layer for Confab: resilient decoding of model-generated
//! reply payloads and the intent-driven conversation controller.
//!
//! The decoder converts untrusted model output into renderable turns via a
//! strict/lenient/raw-fallback cascade; the controller orchestrates one
//! request/response round trip per user turn and publishes observable state.

pub mod controller;
pub mod country;
pub mod decode;

pub use controller::{ChatController, ChatState, ConversationSpec, Intent, Phase};
pub use country::{parse_country_info, parse_validation, CountryInfo};
pub use decode::{decode_body, decode_content};
