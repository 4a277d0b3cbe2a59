// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword intent classification and naive slot spotting.
//!
//! This stands in for the managed NLU the dialogue engine was designed
//! against: zero-cost heuristics, no network, no model. Classification is
//! deliberately shallow; anything it cannot place lands on
//! [`Intent::Unrecognized`] and, mid-collection, is treated as the answer
//! to whichever slot the user was just asked for.

use std::sync::LazyLock;

use regex::Regex;

use concierge_config::model::DialogConfig;
use concierge_dialog::{Intent, SlotName, SlotValue};

use crate::session::SessionAttributes;

/// Greeting words (whole-word match, case-insensitive).
const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "howdy", "greetings"];

/// Greeting phrases (contains, case-insensitive).
const GREETING_PHRASES: &[&str] = &["good morning", "good afternoon", "good evening"];

/// Gratitude words (whole-word match, case-insensitive).
const THANKS_WORDS: &[&str] = &["thanks", "thx", "ty"];

/// Repeat-last-search phrases (contains, case-insensitive).
const REPEAT_PHRASES: &[&str] = &[
    "repeat",
    "last search",
    "same as last",
    "like last time",
    "usual",
];

/// Restaurant-seeking words (whole-word match, case-insensitive).
const DINING_WORDS: &[&str] = &[
    "restaurant",
    "restaurants",
    "food",
    "eat",
    "dining",
    "dine",
    "hungry",
    "lunch",
    "dinner",
    "breakfast",
    "brunch",
    "table",
    "cuisine",
    "suggestion",
    "suggestions",
    "recommend",
    "recommendation",
    "recommendations",
];

/// An email-looking token anywhere in the utterance.
static EMAIL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

/// A clock time: `7:30`, `19:30`, `7 pm`, `7:30pm`.
static TIME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}:\d{2}\s*(?:am|pm)?\b|\b\d{1,2}\s*(?:am|pm)\b").unwrap()
});

/// An ISO calendar date.
static ISO_DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap());

/// A head count: `4 people`, `party of 6`, `2 of us`.
static PARTY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*(?:people|persons|person|guests|of us)\b|\bparty of (\d{1,2})\b")
        .unwrap()
});

/// The outcome of one pass over an utterance: the classified intent and
/// the stored slots merged with whatever this turn supplied.
#[derive(Debug, Clone)]
pub struct ResolvedTurn {
    pub intent: Intent,
    pub slots: concierge_dialog::SlotSet,
}

/// Classifies an utterance into one of the five intents.
///
/// Check order matters: gratitude and repeat phrasing win over dining
/// words, and dining wins over greetings so "hello, italian food please"
/// starts a search instead of a greeting.
pub fn classify(text: &str, config: &DialogConfig) -> Intent {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return Intent::Unrecognized;
    }
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if lower.contains("thank") || THANKS_WORDS.iter().any(|w| words.contains(w)) {
        return Intent::ThankYou;
    }
    if REPEAT_PHRASES.iter().any(|p| lower.contains(p)) {
        return Intent::RepeatLastSearch;
    }
    let mentions_dining = DINING_WORDS.iter().any(|w| words.contains(w))
        || config.cuisines.iter().any(|c| lower.contains(c.as_str()))
        || config.locations.iter().any(|l| lower.contains(l.as_str()));
    if mentions_dining {
        return Intent::DiningSuggestions;
    }
    if GREETING_WORDS.iter().any(|w| words.contains(w))
        || GREETING_PHRASES.iter().any(|p| lower.contains(p))
    {
        return Intent::Greeting;
    }
    Intent::Unrecognized
}

/// Resolves one turn: classifies the intent, binds the utterance to the
/// pending slot when the turn continues collection, and spots slot values
/// mentioned in passing.
///
/// Spotted canonical values overwrite the whole-utterance binding, so
/// "downtown Brooklyn please" answers the location prompt with
/// "brooklyn" rather than the full phrase.
pub fn resolve_turn(text: &str, stored: &SessionAttributes, config: &DialogConfig) -> ResolvedTurn {
    let mut intent = classify(text, config);

    // Mid-collection, an unclassifiable reply is the answer to whatever
    // was just asked.
    if intent == Intent::Unrecognized && stored.pending_slot.is_some() {
        intent = Intent::DiningSuggestions;
    }

    let mut slots = stored.slots.clone();

    if intent == Intent::DiningSuggestions {
        if let Some(pending) = stored.pending_slot {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                slots.set(pending, SlotValue::verbatim(trimmed));
            }
        }
    }

    spot_slots(text, config, &mut slots);

    ResolvedTurn { intent, slots }
}

/// Fills any slot whose value appears verbatim in the utterance.
fn spot_slots(text: &str, config: &DialogConfig, slots: &mut concierge_dialog::SlotSet) {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if let Some(area) = config.locations.iter().find(|a| lower.contains(a.as_str())) {
        slots.set(SlotName::Location, SlotValue::verbatim(area));
    }
    if let Some(cuisine) = config.cuisines.iter().find(|c| lower.contains(c.as_str())) {
        slots.set(SlotName::Cuisine, SlotValue::verbatim(cuisine));
    }
    if let Some(m) = EMAIL_TOKEN.find(text) {
        slots.set(SlotName::Email, SlotValue::verbatim(m.as_str()));
    }
    if let Some(m) = TIME_TOKEN.find(text) {
        slots.set(SlotName::DiningTime, SlotValue::verbatim(m.as_str().trim()));
    } else if words.contains(&"tonight") {
        slots.set(SlotName::DiningTime, SlotValue::verbatim("tonight"));
    }
    if let Some(m) = ISO_DATE_TOKEN.find(text) {
        slots.set(SlotName::DiningDate, SlotValue::verbatim(m.as_str()));
    } else if let Some(keyword) = ["today", "tomorrow"]
        .into_iter()
        .find(|k| words.contains(k))
    {
        slots.set(SlotName::DiningDate, SlotValue::verbatim(keyword));
    }
    if let Some(caps) = PARTY_TOKEN.captures(text) {
        if let Some(n) = caps.get(1).or_else(|| caps.get(2)) {
            slots.set(SlotName::PartySize, SlotValue::verbatim(n.as_str()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use concierge_dialog::SlotSet;

    fn config() -> DialogConfig {
        DialogConfig::default()
    }

    fn with_pending(pending: SlotName) -> SessionAttributes {
        SessionAttributes {
            pending_slot: Some(pending),
            ..SessionAttributes::default()
        }
    }

    #[test]
    fn greetings_classify_as_greeting() {
        for text in ["hello", "Hi there!", "hey", "good evening"] {
            assert_eq!(classify(text, &config()), Intent::Greeting, "{text}");
        }
    }

    #[test]
    fn gratitude_wins_over_other_signals() {
        assert_eq!(classify("thanks!", &config()), Intent::ThankYou);
        assert_eq!(
            classify("thank you for the restaurant tips", &config()),
            Intent::ThankYou
        );
    }

    #[test]
    fn repeat_phrases_classify_as_repeat() {
        for text in ["repeat my last search", "the usual please", "same as last time"] {
            assert_eq!(classify(text, &config()), Intent::RepeatLastSearch, "{text}");
        }
    }

    #[test]
    fn dining_words_and_cuisine_mentions_start_a_search() {
        for text in [
            "I need restaurant suggestions",
            "where should we eat",
            "italian in brooklyn",
            "I'm hungry",
        ] {
            assert_eq!(classify(text, &config()), Intent::DiningSuggestions, "{text}");
        }
    }

    #[test]
    fn dining_beats_greeting_in_mixed_utterances() {
        assert_eq!(
            classify("hello, japanese food please", &config()),
            Intent::DiningSuggestions
        );
    }

    #[test]
    fn short_word_matching_does_not_fire_inside_longer_words() {
        // "great" contains "eat"; word-level matching must not see it.
        assert_eq!(classify("great", &config()), Intent::Unrecognized);
        // "this" contains "hi".
        assert_eq!(classify("this is odd", &config()), Intent::Unrecognized);
    }

    #[test]
    fn unplaceable_text_is_unrecognized() {
        assert_eq!(classify("fhqwhgads", &config()), Intent::Unrecognized);
        assert_eq!(classify("   ", &config()), Intent::Unrecognized);
    }

    #[test]
    fn pending_slot_promotes_unrecognized_to_collection() {
        let resolved = resolve_turn("7 pm", &with_pending(SlotName::DiningTime), &config());
        assert_eq!(resolved.intent, Intent::DiningSuggestions);
        assert_eq!(resolved.slots.effective(SlotName::DiningTime), Some("7 pm"));
    }

    #[test]
    fn pending_answer_is_bound_verbatim() {
        let resolved = resolve_turn("march 5th", &with_pending(SlotName::DiningDate), &config());
        assert_eq!(
            resolved.slots.effective(SlotName::DiningDate),
            Some("march 5th")
        );
    }

    #[test]
    fn spotting_canonicalizes_the_pending_answer() {
        let resolved = resolve_turn(
            "downtown Brooklyn please",
            &with_pending(SlotName::Location),
            &config(),
        );
        assert_eq!(resolved.slots.effective(SlotName::Location), Some("brooklyn"));
    }

    #[test]
    fn spotting_fills_multiple_slots_from_one_utterance() {
        let stored = SessionAttributes::default();
        let resolved = resolve_turn(
            "thai in queens tomorrow at 7:30 pm for 4 people, a@b.com",
            &stored,
            &config(),
        );
        assert_eq!(resolved.intent, Intent::DiningSuggestions);
        assert_eq!(resolved.slots.effective(SlotName::Location), Some("queens"));
        assert_eq!(resolved.slots.effective(SlotName::Cuisine), Some("thai"));
        assert_eq!(resolved.slots.effective(SlotName::DiningDate), Some("tomorrow"));
        assert_eq!(resolved.slots.effective(SlotName::DiningTime), Some("7:30 pm"));
        assert_eq!(resolved.slots.effective(SlotName::PartySize), Some("4"));
        assert_eq!(resolved.slots.effective(SlotName::Email), Some("a@b.com"));
    }

    #[test]
    fn spotting_runs_even_when_unclassified() {
        // A repeat-choice reply like "no, brooklyn this time" must carry
        // the location into the turn for the partial-change path.
        let resolved = resolve_turn("no, brooklyn this time", &SessionAttributes::default(), &config());
        assert_eq!(resolved.slots.effective(SlotName::Location), Some("brooklyn"));
    }

    #[test]
    fn ambiguous_reply_leaves_stored_slots_untouched() {
        let mut stored = SessionAttributes::default();
        stored.slots.set(SlotName::Cuisine, SlotValue::verbatim("thai"));
        let resolved = resolve_turn("maybe", &stored, &config());
        assert_eq!(resolved.intent, Intent::Unrecognized);
        assert_eq!(resolved.slots.effective(SlotName::Cuisine), Some("thai"));
        let mut expected = SlotSet::default();
        expected.set(SlotName::Cuisine, SlotValue::verbatim("thai"));
        assert_eq!(resolved.slots, expected);
    }

    #[test]
    fn party_of_form_captures_the_count() {
        let resolved = resolve_turn(
            "a table for party of 6",
            &SessionAttributes::default(),
            &config(),
        );
        assert_eq!(resolved.slots.effective(SlotName::PartySize), Some("6"));
    }

    #[test]
    fn tonight_spots_as_a_time() {
        let resolved = resolve_turn(
            "dinner tonight in hoboken",
            &SessionAttributes::default(),
            &config(),
        );
        assert_eq!(resolved.slots.effective(SlotName::DiningTime), Some("tonight"));
        assert_eq!(resolved.slots.effective(SlotName::Location), Some("hoboken"));
    }

    #[test]
    fn iso_dates_are_spotted() {
        let resolved = resolve_turn(
            "book for 2026-12-31 please",
            &SessionAttributes::default(),
            &config(),
        );
        assert_eq!(
            resolved.slots.effective(SlotName::DiningDate),
            Some("2026-12-31")
        );
    }

    #[test]
    fn bare_numbers_are_not_spotted_as_anything() {
        // Bound only through the pending slot; validation then applies
        // the raw-text guards.
        let resolved = resolve_turn("7", &with_pending(SlotName::DiningDate), &config());
        assert_eq!(resolved.slots.effective(SlotName::DiningDate), Some("7"));
        assert!(resolved.slots.dining_time.is_none());
        assert!(resolved.slots.party_size.is_none());
    }
}
