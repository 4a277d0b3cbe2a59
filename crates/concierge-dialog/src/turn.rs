// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn input and output shapes at the engine boundary.

use std::collections::BTreeMap;

use crate::intent::Intent;
use crate::slots::{SlotName, SlotSet};

/// Which phase of slot collection the host invoked the engine in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Slots are still being gathered; validate whatever is filled.
    Validating,
    /// The host considers every required slot filled; finalize.
    Fulfilling,
}

/// One conversational turn presented to the engine.
#[derive(Debug, Clone)]
pub struct TurnInput {
    /// Opaque conversation identifier; source of the derived user id.
    pub session_id: String,
    pub intent: Intent,
    pub phase: TurnPhase,
    pub slots: SlotSet,
    /// Opaque string bag round-tripped by the host between turns.
    pub attributes: BTreeMap<String, String>,
    /// Verbatim turn text, used only for keyword disambiguation.
    pub transcript: String,
}

/// Terminal outcome reported when a turn closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentState {
    Success,
    Failure,
}

/// What the host should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Re-ask exactly one slot with a slot-specific message.
    ElicitSlot { slot: SlotName, message: String },
    /// Everything filled so far checks out; the host prompts the next
    /// unfilled slot per its default collection policy.
    Delegate,
    /// End the interaction with a final message.
    Close {
        fulfillment: FulfillmentState,
        message: String,
    },
}

/// Engine response: the directive plus the slot and attribute snapshots
/// the host must carry into the next turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutput {
    pub directive: Directive,
    pub slots: SlotSet,
    pub attributes: BTreeMap<String, String>,
}

impl TurnOutput {
    pub(crate) fn elicit(
        slot: SlotName,
        message: String,
        slots: SlotSet,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            directive: Directive::ElicitSlot { slot, message },
            slots,
            attributes,
        }
    }

    pub(crate) fn delegate(slots: SlotSet, attributes: BTreeMap<String, String>) -> Self {
        Self {
            directive: Directive::Delegate,
            slots,
            attributes,
        }
    }

    pub(crate) fn close(
        fulfillment: FulfillmentState,
        message: impl Into<String>,
        slots: SlotSet,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            directive: Directive::Close {
                fulfillment,
                message: message.into(),
            },
            slots,
            attributes,
        }
    }

    /// The user-facing message carried by this output, if any.
    pub fn message(&self) -> Option<&str> {
        match &self.directive {
            Directive::ElicitSlot { message, .. } | Directive::Close { message, .. } => {
                Some(message)
            }
            Directive::Delegate => None,
        }
    }

    /// Whether this output ends the interaction.
    pub fn is_close(&self) -> bool {
        matches!(self.directive, Directive::Close { .. })
    }
}
