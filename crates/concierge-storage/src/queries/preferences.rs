// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Preference store operations: one remembered search per user.

use concierge_core::ConciergeError;
use rusqlite::params;

use crate::database::Database;
use crate::models::UserPreferences;

/// Fetch the remembered preferences for a user.
pub async fn get_preferences(
    db: &Database,
    user_id: &str,
) -> Result<Option<UserPreferences>, ConciergeError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT location, cuisine, email, party_size, last_search_at
                 FROM preferences WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(UserPreferences {
                        location: row.get(0)?,
                        cuisine: row.get(1)?,
                        email: row.get(2)?,
                        party_size: row.get(3)?,
                        last_search_at: row.get(4)?,
                    })
                },
            );
            match result {
                Ok(prefs) => Ok(Some(prefs)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Save (or overwrite) the user's preference record.
pub async fn save_preferences(
    db: &Database,
    user_id: &str,
    prefs: &UserPreferences,
) -> Result<(), ConciergeError> {
    let user_id = user_id.to_string();
    let prefs = prefs.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO preferences
                 (user_id, location, cuisine, email, party_size, last_search_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user_id,
                    prefs.location,
                    prefs.cuisine,
                    prefs.email,
                    prefs.party_size,
                    prefs.last_search_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
