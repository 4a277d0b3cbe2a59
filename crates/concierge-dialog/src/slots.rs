// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot types for the dining suggestions conversation.
//!
//! Slots are a fixed-shape record with one optional field per known slot,
//! not an open-ended map. Each captured value keeps the user's verbatim
//! text alongside the resolver's normalized form; the validation rules
//! that distrust over-eager normalization read the raw text.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The six slots of the dining suggestions intent, in elicitation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum SlotName {
    Location,
    Cuisine,
    DiningDate,
    DiningTime,
    PartySize,
    Email,
}

impl SlotName {
    /// Every slot, in the order the host elicits and validates them.
    pub const ALL: [SlotName; 6] = [
        SlotName::Location,
        SlotName::Cuisine,
        SlotName::DiningDate,
        SlotName::DiningTime,
        SlotName::PartySize,
        SlotName::Email,
    ];
}

/// One captured slot value.
///
/// `raw` is the user's verbatim text, `interpreted` is the resolver's
/// normalized form, and `resolved` lists alternative resolutions.
/// Consumers read through [`SlotValue::effective`], which applies the
/// interpreted-then-raw-then-resolved precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValue {
    pub raw: Option<String>,
    pub interpreted: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolved: Vec<String>,
}

impl SlotValue {
    /// A value whose raw, interpreted, and resolved forms are all the
    /// same text. This is what naive in-process resolution produces.
    pub fn verbatim(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw: Some(text.clone()),
            interpreted: Some(text.clone()),
            resolved: vec![text],
        }
    }

    /// The value consumers act on: interpreted, else raw, else the first
    /// resolved alternative.
    pub fn effective(&self) -> Option<&str> {
        self.interpreted
            .as_deref()
            .or(self.raw.as_deref())
            .or_else(|| self.resolved.first().map(String::as_str))
    }

    /// The pre-normalization text, for guards that distrust the resolver.
    /// Falls back to the effective value when no raw text was captured.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw.as_deref().or_else(|| self.effective())
    }
}

/// The fixed-shape slot record carried across turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSet {
    pub location: Option<SlotValue>,
    pub cuisine: Option<SlotValue>,
    pub dining_date: Option<SlotValue>,
    pub dining_time: Option<SlotValue>,
    pub party_size: Option<SlotValue>,
    pub email: Option<SlotValue>,
}

impl SlotSet {
    pub fn get(&self, name: SlotName) -> Option<&SlotValue> {
        match name {
            SlotName::Location => self.location.as_ref(),
            SlotName::Cuisine => self.cuisine.as_ref(),
            SlotName::DiningDate => self.dining_date.as_ref(),
            SlotName::DiningTime => self.dining_time.as_ref(),
            SlotName::PartySize => self.party_size.as_ref(),
            SlotName::Email => self.email.as_ref(),
        }
    }

    pub fn set(&mut self, name: SlotName, value: SlotValue) {
        match name {
            SlotName::Location => self.location = Some(value),
            SlotName::Cuisine => self.cuisine = Some(value),
            SlotName::DiningDate => self.dining_date = Some(value),
            SlotName::DiningTime => self.dining_time = Some(value),
            SlotName::PartySize => self.party_size = Some(value),
            SlotName::Email => self.email = Some(value),
        }
    }

    /// Drops a single slot so the host can re-elicit it.
    pub fn clear_slot(&mut self, name: SlotName) {
        match name {
            SlotName::Location => self.location = None,
            SlotName::Cuisine => self.cuisine = None,
            SlotName::DiningDate => self.dining_date = None,
            SlotName::DiningTime => self.dining_time = None,
            SlotName::PartySize => self.party_size = None,
            SlotName::Email => self.email = None,
        }
    }

    /// Drops every slot.
    pub fn clear(&mut self) {
        *self = SlotSet::default();
    }

    /// The effective value of a slot, if the slot is filled.
    pub fn effective(&self, name: SlotName) -> Option<&str> {
        self.get(name).and_then(SlotValue::effective)
    }

    /// Filled slots in elicitation order.
    pub fn filled(&self) -> Vec<(SlotName, &SlotValue)> {
        SlotName::ALL
            .iter()
            .filter_map(|name| self.get(*name).map(|value| (*name, value)))
            .collect()
    }

    /// The first slot without a usable value, in elicitation order.
    pub fn first_missing(&self) -> Option<SlotName> {
        SlotName::ALL
            .into_iter()
            .find(|name| self.effective(*name).is_none_or(str::is_empty))
    }

    /// Whether every slot carries a usable value.
    pub fn is_complete(&self) -> bool {
        self.first_missing().is_none()
    }
}
