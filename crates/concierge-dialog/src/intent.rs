// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intents the conversation understands.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The classified purpose of one conversational turn.
///
/// Classification happens upstream of the engine: the conversational host
/// maps free text onto one of these before building the turn input. The
/// engine only dispatches on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Intent {
    /// Opening hello; may trigger the personalized welcome-back flow.
    Greeting,
    /// Closing thanks, acknowledged with no side effects.
    ThankYou,
    /// Ask to rerun the remembered last search.
    RepeatLastSearch,
    /// The slot-collecting suggestions conversation.
    DiningSuggestions,
    /// Anything the classifier could not place.
    Unrecognized,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn intent_round_trips_through_strings() {
        let all = [
            Intent::Greeting,
            Intent::ThankYou,
            Intent::RepeatLastSearch,
            Intent::DiningSuggestions,
            Intent::Unrecognized,
        ];
        for intent in all {
            let name = intent.to_string();
            assert_eq!(Intent::from_str(&name).unwrap(), intent);
        }
    }

    #[test]
    fn unknown_intent_name_is_an_error() {
        assert!(Intent::from_str("OrderPizza").is_err());
    }
}
