// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-turn conversation pipeline.
//!
//! [`ConversationHost`] owns what the managed NLU platform used to:
//! resolving the caller to a durable session row, round-tripping the
//! attribute bag, binding free-text replies to the slot being collected,
//! and choosing the next prompt when the engine defers with a
//! default-continue. The dialogue engine stays pure; the host is where
//! session plumbing lives.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use concierge_config::model::DialogConfig;
use concierge_core::types::Session;
use concierge_core::{ConciergeError, StorageAdapter};
use concierge_dialog::{
    messages, DialogEngine, Directive, Intent, SlotName, SlotSet, TurnInput, TurnPhase,
};

use crate::nlu;
use crate::session::SessionAttributes;

/// Drives one conversation turn end to end.
pub struct ConversationHost {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    engine: DialogEngine,
    config: DialogConfig,
    /// `channel:sender` to session-row id, to skip the storage lookup on
    /// the turns after the first.
    sessions: HashMap<String, String>,
}

impl ConversationHost {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        engine: DialogEngine,
        config: DialogConfig,
    ) -> Self {
        Self {
            storage,
            engine,
            config,
            sessions: HashMap::new(),
        }
    }

    /// Runs one turn for `sender_id` and returns the reply text.
    ///
    /// `sender_id` is the stable external conversation identity (the
    /// gateway's session header, "local" for the REPL); it is what the
    /// engine derives the preference key from. The session row only
    /// carries the attribute bag between turns.
    pub async fn process(
        &mut self,
        sender_id: &str,
        channel: &str,
        text: &str,
    ) -> Result<String, ConciergeError> {
        let session_id = self.resolve_or_create_session(sender_id, channel).await?;
        let session = self
            .storage
            .get_session(&session_id)
            .await?
            .ok_or_else(|| ConciergeError::Internal(format!("session {session_id} not found")))?;

        let stored = SessionAttributes::decode(session.attributes.as_deref());
        let resolved = nlu::resolve_turn(text, &stored, &self.config);
        debug!(
            session_id = session_id.as_str(),
            intent = %resolved.intent,
            "turn resolved"
        );

        // Every turn enters in the validating phase, so the value that
        // completes the set is still checked before fulfillment runs.
        let input = TurnInput {
            session_id: sender_id.to_string(),
            intent: resolved.intent,
            phase: TurnPhase::Validating,
            slots: resolved.slots,
            attributes: stored.flags,
            transcript: text.to_string(),
        };
        let mut output = self.engine.handle_turn(input).await;

        // A default-continue with nothing left to ask means collection
        // finished this turn; run the fulfillment pass immediately, the
        // way the external host called back in with the filled slots.
        if matches!(output.directive, Directive::Delegate) && output.slots.is_complete() {
            let followup = TurnInput {
                session_id: sender_id.to_string(),
                intent: Intent::DiningSuggestions,
                phase: TurnPhase::Fulfilling,
                slots: output.slots,
                attributes: output.attributes,
                transcript: text.to_string(),
            };
            output = self.engine.handle_turn(followup).await;
        }

        let (reply, pending_slot) = match &output.directive {
            Directive::ElicitSlot { slot, message } => (message.clone(), Some(*slot)),
            Directive::Delegate => match output.slots.first_missing() {
                Some(next) => (self.prompt_for(next), Some(next)),
                // Complete sets were finalized above; nothing to ask.
                None => (messages::GENERIC_WELCOME.to_string(), None),
            },
            Directive::Close { message, .. } => (message.clone(), None),
        };

        // A close ends the interaction: the next turn starts with empty
        // slots. The flag bag always persists as the engine wrote it.
        let next = if output.is_close() {
            SessionAttributes {
                flags: output.attributes,
                slots: SlotSet::default(),
                pending_slot: None,
            }
        } else {
            SessionAttributes {
                flags: output.attributes,
                slots: output.slots,
                pending_slot,
            }
        };
        self.storage
            .update_session_attributes(&session_id, &next.encode())
            .await?;

        Ok(reply)
    }

    /// The prompt used when the engine defers slot selection to the host.
    fn prompt_for(&self, slot: SlotName) -> String {
        match slot {
            SlotName::Location => messages::location_question(&self.config.locations),
            SlotName::Cuisine => messages::CUISINE_PROMPT.to_string(),
            SlotName::DiningDate => messages::DATE_PROMPT.to_string(),
            SlotName::DiningTime => messages::TIME_PROMPT.to_string(),
            SlotName::PartySize => messages::PARTY_SIZE_PROMPT.to_string(),
            SlotName::Email => messages::EMAIL_PROMPT.to_string(),
        }
    }

    /// Looks up the sender's active session, creating one when none
    /// exists: in-memory map first, then the `sessions` table.
    async fn resolve_or_create_session(
        &mut self,
        sender_id: &str,
        channel: &str,
    ) -> Result<String, ConciergeError> {
        let session_key = format!("{channel}:{sender_id}");
        if let Some(id) = self.sessions.get(&session_key) {
            return Ok(id.clone());
        }

        let active = self.storage.list_sessions(Some("active")).await?;
        for session in &active {
            if session.channel == channel && session.user_id.as_deref() == Some(sender_id) {
                debug!(
                    session_id = session.id.as_str(),
                    "resuming existing session"
                );
                self.sessions.insert(session_key, session.id.clone());
                return Ok(session.id.clone());
            }
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let session = Session {
            id: session_id.clone(),
            channel: channel.to_string(),
            user_id: Some(sender_id.to_string()),
            state: "active".to_string(),
            attributes: None,
            created_at: now.clone(),
            updated_at: now,
        };
        self.storage.create_session(&session).await?;

        info!(
            session_id = session_id.as_str(),
            sender_id = sender_id,
            channel = channel,
            "created new session"
        );

        self.sessions.insert(session_key, session_id.clone());
        Ok(session_id)
    }
}
