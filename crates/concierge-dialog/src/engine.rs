// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dialogue state machine.
//!
//! One turn in, one directive out. All cross-turn state rides in the
//! attribute bag and the preference store, so the engine itself holds no
//! conversation memory and every turn is an independent invocation.
//!
//! Dispatch order matters:
//! 1. a fulfilling suggestions turn finalizes,
//! 2. a reply to the same-or-different question is classified, but only
//!    when the asked-question flag confirms the question was asked in
//!    the immediately preceding turn,
//! 3. everything else dispatches on intent.
//!
//! Rule 2's guard is what keeps an overheard "ok" or "no" during slot
//! collection from hijacking the conversation into the repeat branch.

use std::sync::Arc;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use concierge_config::model::DialogConfig;
use concierge_core::types::{SearchRequest, UserId, UserPreferences};
use concierge_core::{PreferenceStore, RequestQueue};

use crate::intent::Intent;
use crate::messages;
use crate::slots::{SlotName, SlotSet};
use crate::state::{DialogState, SessionFlags};
use crate::turn::{FulfillmentState, TurnInput, TurnOutput, TurnPhase};
use crate::validate;

/// Replies that choose a fresh search over the remembered one.
const DIFFERENT_KEYWORDS: &[&str] = &["different", "new", "no", "nope", "change", "something else"];

/// Replies that accept rerunning the remembered search.
const SAME_KEYWORDS: &[&str] = &["same", "yes", "yeah", "repeat", "again"];

/// The dialogue state machine.
///
/// External stores are injected trait objects so the engine can be
/// driven in tests without any live backend.
pub struct DialogEngine {
    preferences: Arc<dyn PreferenceStore>,
    queue: Arc<dyn RequestQueue>,
    config: DialogConfig,
}

impl DialogEngine {
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        queue: Arc<dyn RequestQueue>,
        config: DialogConfig,
    ) -> Self {
        Self {
            preferences,
            queue,
            config,
        }
    }

    /// Stable pseudonymous user identity derived from the session id.
    /// Not a security boundary; it only keys the preference record.
    pub fn derive_user_id(session_id: &str) -> UserId {
        let digest = Sha256::digest(session_id.as_bytes());
        UserId(hex::encode(digest)[..16].to_string())
    }

    /// Runs one conversational turn.
    ///
    /// Never fails outward: store and queue errors become failure closes
    /// with a user-visible message, per the turn error taxonomy.
    pub async fn handle_turn(&self, input: TurnInput) -> TurnOutput {
        let flags = SessionFlags::from_attributes(&input.attributes);
        let state = flags.state(input.intent);
        debug!(
            session = %input.session_id,
            intent = %input.intent,
            ?state,
            phase = ?input.phase,
            "dialog turn"
        );

        if input.intent == Intent::DiningSuggestions && input.phase == TurnPhase::Fulfilling {
            return self.finalize(input).await;
        }

        if state == DialogState::AwaitingRepeatChoice
            && !matches!(input.intent, Intent::ThankYou | Intent::Greeting)
        {
            return self.handle_repeat_choice(input).await;
        }

        match input.intent {
            Intent::Greeting => self.greet(input).await,
            Intent::ThankYou => {
                let (slots, attributes) = (input.slots, input.attributes);
                TurnOutput::close(
                    FulfillmentState::Success,
                    messages::THANK_YOU_REPLY,
                    slots,
                    attributes,
                )
            }
            Intent::RepeatLastSearch => self.run_repeat(input).await,
            Intent::DiningSuggestions => self.collect(input),
            Intent::Unrecognized => {
                let (slots, attributes) = (input.slots, input.attributes);
                TurnOutput::close(
                    FulfillmentState::Failure,
                    messages::NOT_UNDERSTOOD,
                    slots,
                    attributes,
                )
            }
        }
    }

    /// Greeting turn: personalized when a remembered search exists, in
    /// which case the next reply is treated as the same-or-different
    /// answer.
    async fn greet(&self, input: TurnInput) -> TurnOutput {
        let user = Self::derive_user_id(&input.session_id);
        let mut flags = SessionFlags::from_attributes(&input.attributes);
        let mut attributes = input.attributes.clone();

        let message = match self.load_preferences(&user).await {
            Some(stored) if has_last_search(&stored) => {
                flags.asked_repeat_question = true;
                messages::personalized_welcome(&stored.cuisine, &stored.location)
            }
            _ => {
                flags.asked_repeat_question = false;
                messages::GENERIC_WELCOME.to_string()
            }
        };
        flags.write_to(&mut attributes);

        TurnOutput::close(FulfillmentState::Success, message, input.slots, attributes)
    }

    /// Classifies the reply to the same-or-different question.
    async fn handle_repeat_choice(&self, input: TurnInput) -> TurnOutput {
        let transcript = input.transcript.to_lowercase();
        let wants_different = DIFFERENT_KEYWORDS.iter().any(|kw| transcript.contains(kw));
        let wants_same = SAME_KEYWORDS.iter().any(|kw| transcript.contains(kw));

        if wants_different {
            let mut flags = SessionFlags::from_attributes(&input.attributes);
            flags.asked_repeat_question = false;
            let mut attributes = input.attributes.clone();

            // Partial change: a location given in the same breath
            // survives the reset and collection resumes at cuisine.
            if let Some(location) = input.slots.location.clone() {
                if location.effective().is_some_and(|v| !v.is_empty()) {
                    let mut slots = SlotSet::default();
                    slots.location = Some(location);
                    flags.wants_different = false;
                    flags.write_to(&mut attributes);
                    return TurnOutput::elicit(
                        SlotName::Cuisine,
                        messages::CUISINE_PROMPT.to_string(),
                        slots,
                        attributes,
                    );
                }
            }

            flags.wants_different = true;
            flags.write_to(&mut attributes);
            return TurnOutput::elicit(
                SlotName::Location,
                messages::location_redirect(&self.config.locations),
                SlotSet::default(),
                attributes,
            );
        }

        if wants_same {
            return self.run_repeat(input).await;
        }

        // Neither keyword set matched: ask the same question again and
        // leave the flag standing for the next reply.
        self.reask_repeat_question(input).await
    }

    /// Reruns the remembered search, with turn slots taking precedence
    /// over stored values and the date/time defaults filling the rest.
    async fn run_repeat(&self, input: TurnInput) -> TurnOutput {
        let user = Self::derive_user_id(&input.session_id);
        let mut flags = SessionFlags::from_attributes(&input.attributes);
        flags.asked_repeat_question = false;
        flags.wants_different = false;
        let mut attributes = input.attributes.clone();
        flags.write_to(&mut attributes);

        let stored = self.load_preferences(&user).await.filter(is_complete);
        let Some(stored) = stored else {
            return TurnOutput::close(
                FulfillmentState::Success,
                messages::REPEAT_NO_HISTORY,
                input.slots,
                attributes,
            );
        };

        let location = input
            .slots
            .effective(SlotName::Location)
            .map(str::to_string)
            .unwrap_or_else(|| stored.location.clone());
        let cuisine = input
            .slots
            .effective(SlotName::Cuisine)
            .map(str::to_string)
            .unwrap_or_else(|| stored.cuisine.clone());
        let email = input
            .slots
            .effective(SlotName::Email)
            .map(str::to_string)
            .unwrap_or_else(|| stored.email.clone());
        let party_size = input
            .slots
            .effective(SlotName::PartySize)
            .and_then(validate::parse_party_size)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(stored.party_size);
        let dining_date = input
            .slots
            .effective(SlotName::DiningDate)
            .unwrap_or("today")
            .to_string();
        let dining_time = input
            .slots
            .effective(SlotName::DiningTime)
            .unwrap_or("tonight")
            .to_string();

        self.complete_search(
            &user,
            SearchRequest {
                location,
                cuisine,
                dining_date,
                dining_time,
                party_size,
                email,
                requested_at: now_ts(),
            },
            input.slots,
            attributes,
        )
        .await
    }

    /// Re-asks the same-or-different question without advancing state.
    async fn reask_repeat_question(&self, input: TurnInput) -> TurnOutput {
        let user = Self::derive_user_id(&input.session_id);
        let mut flags = SessionFlags::from_attributes(&input.attributes);
        let mut attributes = input.attributes.clone();

        let message = match self.load_preferences(&user).await {
            Some(stored) if has_last_search(&stored) => {
                messages::personalized_welcome(&stored.cuisine, &stored.location)
            }
            _ => {
                // The record vanished under us; fall back to a fresh start.
                flags.asked_repeat_question = false;
                flags.write_to(&mut attributes);
                messages::GENERIC_WELCOME.to_string()
            }
        };

        TurnOutput::close(FulfillmentState::Success, message, input.slots, attributes)
    }

    /// Validating-phase slot collection: report the first violation or
    /// let the host prompt the next unfilled slot.
    fn collect(&self, input: TurnInput) -> TurnOutput {
        let mut flags = SessionFlags::from_attributes(&input.attributes);
        // The redirect is consumed by the first collecting turn.
        flags.wants_different = false;
        let mut attributes = input.attributes.clone();
        flags.write_to(&mut attributes);

        let today = chrono::Local::now().date_naive();
        match validate::validate_slots(&input.slots, &self.config, today) {
            Some(violation) => {
                debug!(slot = %violation.slot, "slot validation failed");
                let mut slots = input.slots.clone();
                slots.clear_slot(violation.slot);
                TurnOutput::elicit(violation.slot, violation.message, slots, attributes)
            }
            None => TurnOutput::delegate(input.slots, attributes),
        }
    }

    /// Fulfilling-phase completion: persist preferences, enqueue the
    /// request, and confirm.
    async fn finalize(&self, input: TurnInput) -> TurnOutput {
        let mut flags = SessionFlags::from_attributes(&input.attributes);
        flags.asked_repeat_question = false;
        flags.wants_different = false;
        let mut attributes = input.attributes.clone();
        flags.write_to(&mut attributes);

        let location = input.slots.effective(SlotName::Location).map(str::to_string);
        let cuisine = input.slots.effective(SlotName::Cuisine).map(str::to_string);
        let email = input.slots.effective(SlotName::Email).map(str::to_string);
        let (Some(location), Some(cuisine), Some(email)) = (location, cuisine, email) else {
            return TurnOutput::close(
                FulfillmentState::Failure,
                messages::MISSING_DATA,
                input.slots,
                attributes,
            );
        };

        let party_size = match input.slots.effective(SlotName::PartySize) {
            Some(text) => match validate::parse_party_size(text)
                .and_then(|n| u32::try_from(n).ok())
            {
                Some(n) => n,
                None => {
                    return TurnOutput::close(
                        FulfillmentState::Failure,
                        messages::MISSING_DATA,
                        input.slots,
                        attributes,
                    );
                }
            },
            None => 2,
        };
        let dining_date = input
            .slots
            .effective(SlotName::DiningDate)
            .unwrap_or("today")
            .to_string();
        let dining_time = input
            .slots
            .effective(SlotName::DiningTime)
            .unwrap_or("tonight")
            .to_string();

        let user = Self::derive_user_id(&input.session_id);
        self.complete_search(
            &user,
            SearchRequest {
                location,
                cuisine,
                dining_date,
                dining_time,
                party_size,
                email,
                requested_at: now_ts(),
            },
            input.slots,
            attributes,
        )
        .await
    }

    /// The two completion writes: overwrite the preference record, then
    /// enqueue the request. The writes are independent; a failure after
    /// the first is reported, never rolled back.
    async fn complete_search(
        &self,
        user: &UserId,
        request: SearchRequest,
        slots: SlotSet,
        attributes: std::collections::BTreeMap<String, String>,
    ) -> TurnOutput {
        let record = UserPreferences {
            location: request.location.clone(),
            cuisine: request.cuisine.clone(),
            email: request.email.clone(),
            party_size: request.party_size,
            last_search_at: request.requested_at.clone(),
        };
        if let Err(error) = self.preferences.save_preferences(user, &record).await {
            warn!(user = %user.0, %error, "preference save failed");
            return TurnOutput::close(
                FulfillmentState::Failure,
                messages::TRANSIENT_FAILURE,
                slots,
                attributes,
            );
        }

        match self.queue.enqueue(&request).await {
            Ok(entry_id) => {
                debug!(user = %user.0, entry_id, "search request enqueued");
                let message = messages::search_confirmation(
                    &request.cuisine,
                    &request.location,
                    &request.email,
                );
                TurnOutput::close(FulfillmentState::Success, message, slots, attributes)
            }
            Err(error) => {
                warn!(user = %user.0, %error, "enqueue failed");
                TurnOutput::close(
                    FulfillmentState::Failure,
                    messages::TRANSIENT_FAILURE,
                    slots,
                    attributes,
                )
            }
        }
    }

    async fn load_preferences(&self, user: &UserId) -> Option<UserPreferences> {
        match self.preferences.get_preferences(user).await {
            Ok(stored) => stored,
            Err(error) => {
                warn!(user = %user.0, %error, "preference lookup failed");
                None
            }
        }
    }
}

/// Whether the record can personalize the greeting.
fn has_last_search(stored: &UserPreferences) -> bool {
    !stored.cuisine.is_empty() && !stored.location.is_empty()
}

/// Whether the record can back a repeat search on its own.
fn is_complete(stored: &UserPreferences) -> bool {
    !stored.location.is_empty() && !stored.cuisine.is_empty() && !stored.email.is_empty()
}

fn now_ts() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
