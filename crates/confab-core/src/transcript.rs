// SPDX-FileCopyrightText: 2026 Confab Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation transcript: an append-only ordered sequence of turns.
//!
//! Element 0 is always a locally synthesized assistant greeting. It is shown
//! to the user but never sent to the provider; [`Transcript::history`] skips
//! it when the request builder walks the conversation.

use crate::types::{Role, Turn};

/// Ordered conversation state, append-only from the controller's perspective.
#[derive(Debug, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates a transcript seeded with the local greeting turn.
    pub fn new(greeting: Turn) -> Self {
        Self {
            turns: vec![greeting],
        }
    }

    /// Appends a turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns, greeting included, for display.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The turns that form the outbound conversation history: everything
    /// except the synthesized greeting at index 0.
    pub fn history(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().skip(1)
    }

    /// Text of the most recent user turn, for manual retry. `None` when the
    /// user has not sent anything yet.
    pub fn last_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.text.as_str())
    }

    /// The most recent assistant turn that carries a raw provider payload.
    pub fn last_raw_payload(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .filter(|t| t.role == Role::Assistant)
            .find_map(|t| t.raw_payload.as_deref())
    }

    /// Discards the conversation and reseeds with a fresh greeting.
    pub fn reset(&mut self, greeting: Turn) {
        self.turns.clear();
        self.turns.push(greeting);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
