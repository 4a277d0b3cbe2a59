// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Every user-visible message the conversation produces.
//!
//! Fixed texts are consts; texts that name slot values or configured
//! allow-lists are builders. Allow-list messages render the configured
//! entries title-cased in a spoken "A, B, or C" list, so a deployment
//! that narrows coverage prompts only for what it can serve.

/// First-time greeting.
pub const GENERIC_WELCOME: &str =
    "Hi there! I can help you find restaurants in and around NYC. What are you looking for today?";

/// Reply to a repeat request when nothing is stored for the user.
pub const REPEAT_NO_HISTORY: &str =
    "Hi there! I can help you find restaurants. What would you like today?";

/// Acknowledgment for a thank-you turn.
pub const THANK_YOU_REPLY: &str = "You're welcome!";

/// Soft re-ask for anything the classifier could not place.
pub const NOT_UNDERSTOOD: &str = "I did not understand that.";

/// Cuisine prompt used after a partial "different" change kept the location.
pub const CUISINE_PROMPT: &str = "What cuisine would you like to try?";

/// Date elicitation prompt.
pub const DATE_PROMPT: &str = "What day would you like to dine?";

/// Time elicitation prompt.
pub const TIME_PROMPT: &str = "What time would you like to dine?";

/// Party size elicitation prompt.
pub const PARTY_SIZE_PROMPT: &str = "How many people are in your party?";

/// Email elicitation prompt.
pub const EMAIL_PROMPT: &str = "What email address should I send my suggestions to?";

/// Close message when a store or queue write fails mid-turn.
pub const TRANSIENT_FAILURE: &str = "Sorry, something went wrong. Please try again.";

/// Close message when required data is missing at finalize time.
pub const MISSING_DATA: &str = "Sorry, I'm missing some required information. Please try again.";

/// Party size rejection for non-numeric input.
pub const VALID_NUMBER: &str = "Please enter a valid number.";

/// Email rejection.
pub const VALID_EMAIL: &str = "Please enter a valid email address.";

/// Dining date rejection.
pub const VALID_DATE: &str =
    "Please enter a valid date (like \"tomorrow\" or \"2025-12-31\"). It can't be in the past.";

/// Dining time rejection.
pub const VALID_TIME: &str = "Please enter a valid time, like \"7 pm\" or \"19:30\".";

/// Welcome-back question naming the remembered search.
pub fn personalized_welcome(cuisine: &str, location: &str) -> String {
    format!(
        "Welcome back! Last time you searched for {cuisine} food in {location}. \
         Would you like the same, or something different today?"
    )
}

/// Confirmation naming the cuisine, location, and delivery address.
pub fn search_confirmation(cuisine: &str, location: &str, email: &str) -> String {
    format!(
        "You're all set! I'll send {cuisine} restaurant suggestions in {location} \
         to {email} shortly. Have a great day!"
    )
}

/// Location prompt emitted on the "different" redirect.
pub fn location_redirect(locations: &[String]) -> String {
    format!(
        "Sure! Which area would you like to dine in? ({})",
        spoken_list(locations)
    )
}

/// Plain location elicitation prompt.
pub fn location_question(locations: &[String]) -> String {
    format!(
        "Which area would you like to dine in? ({})",
        spoken_list(locations)
    )
}

/// Location rejection listing the covered areas.
pub fn invalid_location(locations: &[String]) -> String {
    format!(
        "Sorry, I only have suggestions for {}.",
        spoken_list(locations)
    )
}

/// Cuisine rejection naming the offered value and the covered cuisines.
pub fn invalid_cuisine(cuisine: &str, cuisines: &[String]) -> String {
    format!(
        "Sorry, I don't have suggestions for {cuisine}. Try {}.",
        spoken_list(cuisines)
    )
}

/// Party size rejection for out-of-range input.
pub fn party_size_range(max: u32) -> String {
    format!("Please enter a number between 1 and {max}.")
}

/// Renders entries as a spoken list: "A, B, or C".
fn spoken_list(items: &[String]) -> String {
    let titled: Vec<String> = items.iter().map(|item| title_case(item)).collect();
    match titled.len() {
        0 => String::new(),
        1 => titled.into_iter().next().unwrap_or_default(),
        2 => format!("{} or {}", titled[0], titled[1]),
        _ => {
            let (last, rest) = titled.split_last().unwrap_or((&titled[0], &[]));
            format!("{}, or {last}", rest.join(", "))
        }
    }
}

/// Uppercases the first letter of each word: "long island city" becomes
/// "Long Island City".
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
