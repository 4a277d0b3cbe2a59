// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialization of per-session conversation state.
//!
//! Everything the host must remember between turns rides in one JSON
//! document stored on the session row: the engine's flag bag, the
//! partially collected slots, and which slot the user is currently being
//! asked for. The engine never sees this shape; it gets the flag bag and
//! slots separately.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use concierge_dialog::{SlotName, SlotSet};

/// The durable state bag round-tripped through the `sessions` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAttributes {
    /// Engine-owned flags ("asked_repeat_question", "wants_different").
    #[serde(default)]
    pub flags: BTreeMap<String, String>,

    /// Slots collected so far in the current interaction.
    #[serde(default)]
    pub slots: SlotSet,

    /// The slot the previous turn prompted for, if any. The next
    /// free-text reply is bound to this slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_slot: Option<SlotName>,
}

impl SessionAttributes {
    /// Decodes the stored document. Malformed or missing data degrades to
    /// a fresh bag rather than wedging the session.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str(raw) {
            Ok(attrs) => attrs,
            Err(error) => {
                warn!(%error, "unreadable session attributes, starting fresh");
                Self::default()
            }
        }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use concierge_dialog::SlotValue;

    #[test]
    fn round_trips_flags_slots_and_pending_slot() {
        let mut attrs = SessionAttributes::default();
        attrs
            .flags
            .insert("asked_repeat_question".to_string(), "true".to_string());
        attrs
            .slots
            .set(SlotName::Cuisine, SlotValue::verbatim("thai"));
        attrs.pending_slot = Some(SlotName::Location);

        let decoded = SessionAttributes::decode(Some(&attrs.encode()));
        assert_eq!(decoded, attrs);
    }

    #[test]
    fn missing_attributes_decode_to_default() {
        assert_eq!(SessionAttributes::decode(None), SessionAttributes::default());
    }

    #[test]
    fn malformed_attributes_decode_to_default() {
        let decoded = SessionAttributes::decode(Some("not json at all"));
        assert_eq!(decoded, SessionAttributes::default());
    }

    #[test]
    fn partial_documents_fill_missing_fields() {
        let decoded = SessionAttributes::decode(Some(r#"{"flags":{"wants_different":"true"}}"#));
        assert_eq!(
            decoded.flags.get("wants_different").map(String::as_str),
            Some("true")
        );
        assert_eq!(decoded.slots, SlotSet::default());
        assert!(decoded.pending_slot.is_none());
    }
}
