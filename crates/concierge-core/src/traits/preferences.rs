// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preference store trait for remembering a user's last search.

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::ComponentAdapter;
use crate::types::{UserId, UserPreferences};

/// Adapter for the per-user preference store.
///
/// Stores exactly one record per user: the criteria of their most recent
/// completed search. A save overwrites any prior record wholesale.
#[async_trait]
pub trait PreferenceStore: ComponentAdapter {
    /// Fetches the remembered preferences for a user, or `None` for a
    /// first-time visitor.
    async fn get_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<UserPreferences>, ConciergeError>;

    /// Saves (or overwrites) the user's preference record.
    async fn save_preferences(
        &self,
        user: &UserId,
        prefs: &UserPreferences,
    ) -> Result<(), ConciergeError>;
}
