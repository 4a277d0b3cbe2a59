// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine: intent model, slot validation, and the
//! turn-by-turn dialogue state machine.
//!
//! The engine is deliberately host-agnostic. It receives a [`TurnInput`]
//! (intent, slots, attribute bag, transcript) and returns a
//! [`TurnOutput`] directive; the hosting channel decides how prompts are
//! rendered and where the attribute bag lives between turns. All
//! durable effects go through the [`PreferenceStore`] and
//! [`RequestQueue`] traits.
//!
//! [`PreferenceStore`]: concierge_core::PreferenceStore
//! [`RequestQueue`]: concierge_core::RequestQueue

pub mod engine;
pub mod intent;
pub mod messages;
pub mod slots;
pub mod state;
pub mod turn;
pub mod validate;

pub use engine::DialogEngine;
pub use intent::Intent;
pub use slots::{SlotName, SlotSet, SlotValue};
pub use state::{DialogState, SessionFlags};
pub use turn::{Directive, FulfillmentState, TurnInput, TurnOutput, TurnPhase};
pub use validate::{validate_slots, SlotViolation};
