// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot validation rules.
//!
//! Each rule is applied independently and reports a slot-specific
//! message. The date and time rules additionally check the raw
//! pre-normalization text: the upstream resolver turns bare numbers
//! like "-1" into plausible-looking dates and times, so the raw text
//! is the only trustworthy signal that the input was garbage.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate};
use regex::Regex;

use concierge_config::model::DialogConfig;

use crate::messages;
use crate::slots::{SlotName, SlotSet, SlotValue};

/// "march 5" / "march 5th" spoken forms.
static MONTH_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z]+)\s+(\d{1,2})(?:st|nd|rd|th)?$").unwrap());

/// "5 march" / "5th march" spoken forms.
static DAY_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]+)$").unwrap());

/// 24-hour "19:30" form.
static HOUR_MINUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());

/// 12-hour "7 pm" / "7:15pm" forms.
static TWELVE_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm)$").unwrap());

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A failed validation: which slot and what to tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotViolation {
    pub slot: SlotName,
    pub message: String,
}

/// Validates every filled slot in elicitation order and reports the
/// first violation, or `None` when everything filled so far is valid.
pub fn validate_slots(
    slots: &SlotSet,
    config: &DialogConfig,
    today: NaiveDate,
) -> Option<SlotViolation> {
    for (name, value) in slots.filled() {
        let Some(text) = value.effective() else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        let result = match name {
            SlotName::Location => validate_location(text, config),
            SlotName::Cuisine => validate_cuisine(text, config),
            SlotName::DiningDate => validate_date(value, today).map(|_| ()),
            SlotName::DiningTime => validate_time(value),
            SlotName::PartySize => validate_party_size(text, config),
            SlotName::Email => validate_email(text),
        };
        if let Err(message) = result {
            return Some(SlotViolation { slot: name, message });
        }
    }
    None
}

/// Case-insensitive substring match against the covered areas, so
/// "downtown Brooklyn" still lands in Brooklyn.
pub fn validate_location(text: &str, config: &DialogConfig) -> Result<(), String> {
    let lower = text.to_lowercase();
    if config
        .locations
        .iter()
        .any(|area| lower.contains(&area.to_lowercase()))
    {
        Ok(())
    } else {
        Err(messages::invalid_location(&config.locations))
    }
}

/// Case-insensitive exact match against the covered cuisines.
pub fn validate_cuisine(text: &str, config: &DialogConfig) -> Result<(), String> {
    if config
        .cuisines
        .iter()
        .any(|cuisine| cuisine.eq_ignore_ascii_case(text))
    {
        Ok(())
    } else {
        Err(messages::invalid_cuisine(text, &config.cuisines))
    }
}

/// Integer in [1, max], tolerating a decimal rendering like "4.0".
pub fn validate_party_size(text: &str, config: &DialogConfig) -> Result<(), String> {
    let Some(n) = parse_party_size(text) else {
        return Err(messages::VALID_NUMBER.to_string());
    };
    if n < 1 || n > i64::from(config.max_party_size) {
        return Err(messages::party_size_range(config.max_party_size));
    }
    Ok(())
}

/// Parses a party size, accepting "4" and "4.0" but not "4.5".
pub fn parse_party_size(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

/// Shallow syntactic check: an email needs an `@` and a `.`.
pub fn validate_email(text: &str) -> Result<(), String> {
    if text.contains('@') && text.contains('.') {
        Ok(())
    } else {
        Err(messages::VALID_EMAIL.to_string())
    }
}

/// Validates a dining date and returns the calendar day it names.
///
/// Accepts "today"/"tomorrow"/"yesterday", ISO `YYYY-MM-DD`, and spoken
/// month-day forms, inferring the next occurrence when the day has
/// already passed this year. Rejects raw text that parses as a bare
/// integer or float regardless of the interpreted value, and any date
/// strictly before `today`.
pub fn validate_date(slot: &SlotValue, today: NaiveDate) -> Result<NaiveDate, String> {
    // The raw text is checked before the interpreted value on purpose.
    if let Some(raw) = slot.raw_text() {
        let trimmed = raw.trim();
        if trimmed.parse::<i64>().is_ok() || trimmed.parse::<f64>().is_ok() {
            return Err(messages::VALID_DATE.to_string());
        }
    }

    let text = slot
        .effective()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let parsed = parse_date_text(&text, today).ok_or_else(|| messages::VALID_DATE.to_string())?;
    if parsed < today {
        return Err(messages::VALID_DATE.to_string());
    }
    Ok(parsed)
}

/// Validates a dining time.
///
/// Accepts 24-hour `HH:MM`, a bare hour in [1, 12], and 12-hour
/// `H(:MM)?(am|pm)` forms. Rejects raw text that is a negative integer
/// or an integer above 23 regardless of the interpreted value.
pub fn validate_time(slot: &SlotValue) -> Result<(), String> {
    if let Some(raw) = slot.raw_text() {
        if let Ok(n) = raw.trim().parse::<i64>() {
            if !(0..=23).contains(&n) {
                return Err(messages::VALID_TIME.to_string());
            }
        }
    }

    let text = slot
        .effective()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if valid_time_text(&text) {
        Ok(())
    } else {
        Err(messages::VALID_TIME.to_string())
    }
}

fn parse_date_text(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    match text {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => {
            if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                return Some(date);
            }
            let (month_name, day) = if let Some(caps) = MONTH_DAY.captures(text) {
                (caps[1].to_string(), caps[2].parse::<u32>().ok()?)
            } else if let Some(caps) = DAY_MONTH.captures(text) {
                (caps[2].to_string(), caps[1].parse::<u32>().ok()?)
            } else {
                return None;
            };
            next_occurrence(month_number(&month_name)?, day, today)
        }
    }
}

/// The named month-day this year, or next year if it already passed.
fn next_occurrence(month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

/// Month number for a full name or an unambiguous prefix of at least
/// three letters ("mar", "sept").
fn month_number(name: &str) -> Option<u32> {
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(name))
        .map(|index| index as u32 + 1)
}

fn valid_time_text(text: &str) -> bool {
    if let Ok(n) = text.parse::<i64>() {
        // A bare number is read as a spoken 12-hour value.
        return (1..=12).contains(&n);
    }
    if let Some(caps) = HOUR_MINUTE.captures(text) {
        let hour: u32 = caps[1].parse().unwrap_or(99);
        let minute: u32 = caps[2].parse().unwrap_or(99);
        return hour <= 23 && minute <= 59;
    }
    if let Some(caps) = TWELVE_HOUR.captures(text) {
        let hour: u32 = caps[1].parse().unwrap_or(0);
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(99))
            .unwrap_or(0);
        return (1..=12).contains(&hour) && minute <= 59;
    }
    false
}
