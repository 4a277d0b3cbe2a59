// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit dialogue state and its attribute-bag wire form.
//!
//! The conversational host round-trips an opaque string map between
//! turns. Two flags live in it: whether the same-or-different question
//! was asked in the immediately preceding turn, and whether a
//! "different" redirect is still pending its slot-clearing turn.
//! [`DialogState`] is the typed view; the map is only the serialization
//! at the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::intent::Intent;

/// Attribute key recording that the same-or-different question was just asked.
pub const ASKED_REPEAT_KEY: &str = "asked_repeat_question";

/// Attribute key recording a pending "different" redirect.
pub const WANTS_DIFFERENT_KEY: &str = "wants_different";

/// Where the conversation stands at the start of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogState {
    /// No multi-turn exchange in flight.
    Idle,
    /// The welcome-back question was asked last turn; the next reply is
    /// classified as same/different/neither.
    AwaitingRepeatChoice,
    /// The host is eliciting and validating suggestion slots.
    CollectingSlots,
}

/// The conversation flags carried in the session attribute bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    pub asked_repeat_question: bool,
    pub wants_different: bool,
}

impl SessionFlags {
    /// Reads the flags out of the attribute bag. Absent keys are false.
    pub fn from_attributes(attrs: &BTreeMap<String, String>) -> Self {
        Self {
            asked_repeat_question: attrs.get(ASKED_REPEAT_KEY).is_some_and(|v| v == "true"),
            wants_different: attrs.get(WANTS_DIFFERENT_KEY).is_some_and(|v| v == "true"),
        }
    }

    /// Writes both flags back into the attribute bag.
    pub fn write_to(&self, attrs: &mut BTreeMap<String, String>) {
        attrs.insert(
            ASKED_REPEAT_KEY.to_string(),
            bool_str(self.asked_repeat_question),
        );
        attrs.insert(
            WANTS_DIFFERENT_KEY.to_string(),
            bool_str(self.wants_different),
        );
    }

    /// The typed state implied by the flags and the turn's intent.
    ///
    /// The asked-repeat flag wins: while it is set, the next reply belongs
    /// to the same-or-different question no matter what the classifier
    /// made of it.
    pub fn state(&self, intent: Intent) -> DialogState {
        if self.asked_repeat_question {
            DialogState::AwaitingRepeatChoice
        } else if self.wants_different || intent == Intent::DiningSuggestions {
            DialogState::CollectingSlots
        } else {
            DialogState::Idle
        }
    }
}

fn bool_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}
