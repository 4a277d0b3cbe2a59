// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for session persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::ComponentAdapter;
use crate::types::Session;

/// Adapter for storage and persistence backends.
///
/// Storage adapters manage the lifecycle of database connections and
/// provide session persistence: each conversation's lifecycle state plus
/// the dialog layer's serialized attributes survive process restarts.
#[async_trait]
pub trait StorageAdapter: ComponentAdapter {
    /// Initializes the storage backend (migrations, connection pool, etc.).
    async fn initialize(&self) -> Result<(), ConciergeError>;

    /// Closes the storage backend, flushing pending writes and releasing connections.
    async fn close(&self) -> Result<(), ConciergeError>;

    /// Creates a new session row.
    async fn create_session(&self, session: &Session) -> Result<(), ConciergeError>;

    /// Fetches a session by id, or `None` if it does not exist.
    async fn get_session(&self, id: &str) -> Result<Option<Session>, ConciergeError>;

    /// Lists sessions, optionally filtered by lifecycle state.
    async fn list_sessions(&self, state: Option<&str>) -> Result<Vec<Session>, ConciergeError>;

    /// Updates a session's lifecycle state.
    async fn update_session_state(&self, id: &str, state: &str) -> Result<(), ConciergeError>;

    /// Replaces a session's serialized dialog attributes.
    async fn update_session_attributes(
        &self,
        id: &str,
        attributes: &str,
    ) -> Result<(), ConciergeError>;

    /// Marks all active sessions as interrupted, returning how many changed.
    ///
    /// Called on startup so sessions orphaned by a crash are not mistaken
    /// for live conversations.
    async fn mark_stale_sessions(&self) -> Result<u64, ConciergeError>;
}
