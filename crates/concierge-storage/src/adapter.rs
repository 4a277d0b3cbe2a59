// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage, preference, queue, and search traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use concierge_config::model::StorageConfig;
use concierge_core::types::{QueueEntry, Restaurant, SearchRequest, Session, UserPreferences};
use concierge_core::{
    AdapterType, ComponentAdapter, ConciergeError, HealthStatus, PreferenceStore, RequestQueue,
    RestaurantSearch, StorageAdapter, UserId,
};

use crate::database::Database;
use crate::queries;

/// Name of the durable queue fulfillment requests travel on.
const FULFILLMENT_QUEUE: &str = "fulfillment";

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`]. One instance backs all four
/// persistence traits, so sessions, preferences, the queue, and the
/// restaurant index share a single writer.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, ConciergeError> {
        self.db.get().ok_or_else(|| ConciergeError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Load a restaurant record into the index (used by import tooling and tests).
    pub async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<(), ConciergeError> {
        queries::restaurants::insert_restaurant(self.db()?, restaurant).await
    }
}

#[async_trait]
impl ComponentAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ConciergeError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ConciergeError> {
        let path = self.config.database_path.clone();
        let db = Database::open(&path).await?;
        self.db.set(db).map_err(|_| ConciergeError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ConciergeError> {
        let db = self.db()?;
        // Checkpoint WAL before close.
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn create_session(&self, session: &Session) -> Result<(), ConciergeError> {
        queries::sessions::create_session(self.db()?, session).await
    }

    async fn get_session(&self, id: &str) -> Result<Option<Session>, ConciergeError> {
        queries::sessions::get_session(self.db()?, id).await
    }

    async fn list_sessions(&self, state: Option<&str>) -> Result<Vec<Session>, ConciergeError> {
        queries::sessions::list_sessions(self.db()?, state).await
    }

    async fn update_session_state(&self, id: &str, state: &str) -> Result<(), ConciergeError> {
        queries::sessions::update_session_state(self.db()?, id, state).await
    }

    async fn update_session_attributes(
        &self,
        id: &str,
        attributes: &str,
    ) -> Result<(), ConciergeError> {
        queries::sessions::update_session_attributes(self.db()?, id, attributes).await
    }

    async fn mark_stale_sessions(&self) -> Result<u64, ConciergeError> {
        queries::sessions::mark_stale_sessions(self.db()?).await
    }
}

#[async_trait]
impl PreferenceStore for SqliteStorage {
    async fn get_preferences(
        &self,
        user: &UserId,
    ) -> Result<Option<UserPreferences>, ConciergeError> {
        queries::preferences::get_preferences(self.db()?, &user.0).await
    }

    async fn save_preferences(
        &self,
        user: &UserId,
        prefs: &UserPreferences,
    ) -> Result<(), ConciergeError> {
        queries::preferences::save_preferences(self.db()?, &user.0, prefs).await
    }
}

#[async_trait]
impl RequestQueue for SqliteStorage {
    async fn enqueue(&self, request: &SearchRequest) -> Result<i64, ConciergeError> {
        let payload =
            serde_json::to_string(request).map_err(|e| ConciergeError::Storage {
                source: Box::new(e),
            })?;
        queries::queue::enqueue(self.db()?, FULFILLMENT_QUEUE, &payload).await
    }

    async fn dequeue(&self) -> Result<Option<QueueEntry>, ConciergeError> {
        queries::queue::dequeue(self.db()?, FULFILLMENT_QUEUE).await
    }

    async fn ack(&self, id: i64) -> Result<(), ConciergeError> {
        queries::queue::ack(self.db()?, id).await
    }

    async fn fail(&self, id: i64) -> Result<(), ConciergeError> {
        queries::queue::fail(self.db()?, id).await
    }
}

#[async_trait]
impl RestaurantSearch for SqliteStorage {
    async fn search(
        &self,
        cuisine: &str,
        location: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Restaurant>, ConciergeError> {
        queries::restaurants::search_restaurants(self.db()?, cuisine, location, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_component_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        let result = storage.initialize().await;
        assert!(result.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn health_check_returns_healthy_when_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        let status = storage.health_check().await.unwrap();
        assert_eq!(status, HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn health_check_fails_when_not_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        let result = storage.health_check().await;
        assert!(result.is_err(), "health_check should fail before initialize");
    }

    #[tokio::test]
    async fn full_session_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        // Create a session.
        let session = Session {
            id: "sess-adapter-1".to_string(),
            channel: "http".to_string(),
            user_id: Some("user-1".to_string()),
            state: "active".to_string(),
            attributes: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        storage.create_session(&session).await.unwrap();

        // Retrieve it.
        let retrieved = storage.get_session("sess-adapter-1").await.unwrap();
        assert!(retrieved.is_some());
        let retrieved = retrieved.unwrap();
        assert_eq!(retrieved.id, "sess-adapter-1");
        assert_eq!(retrieved.channel, "http");

        // Store dialog attributes.
        storage
            .update_session_attributes("sess-adapter-1", r#"{"phase":"Greeting"}"#)
            .await
            .unwrap();
        let updated = storage.get_session("sess-adapter-1").await.unwrap().unwrap();
        assert_eq!(updated.attributes.as_deref(), Some(r#"{"phase":"Greeting"}"#));

        // Update session state.
        storage
            .update_session_state("sess-adapter-1", "completed")
            .await
            .unwrap();
        let updated = storage.get_session("sess-adapter-1").await.unwrap().unwrap();
        assert_eq!(updated.state, "completed");

        // List sessions.
        let all = storage.list_sessions(None).await.unwrap();
        assert_eq!(all.len(), 1);

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn queue_roundtrip_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("queue_adapter.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let request = SearchRequest {
            location: "brooklyn".to_string(),
            cuisine: "thai".to_string(),
            dining_date: "tomorrow".to_string(),
            dining_time: "7 pm".to_string(),
            party_size: 2,
            email: "diner@example.com".to_string(),
            requested_at: "2026-08-01T19:00:00.000Z".to_string(),
        };

        let id = storage.enqueue(&request).await.unwrap();
        assert!(id > 0);

        let entry = storage.dequeue().await.unwrap();
        assert!(entry.is_some());
        let entry = entry.unwrap();
        assert_eq!(entry.status, "processing");

        // The payload deserializes back into the request.
        let parsed: SearchRequest = serde_json::from_str(&entry.payload).unwrap();
        assert_eq!(parsed, request);

        storage.ack(entry.id).await.unwrap();

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn preferences_roundtrip_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("prefs_adapter.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let user = UserId("abc123".to_string());
        assert!(storage.get_preferences(&user).await.unwrap().is_none());

        let prefs = UserPreferences {
            location: "queens".to_string(),
            cuisine: "korean".to_string(),
            email: "diner@example.com".to_string(),
            party_size: 3,
            last_search_at: "2026-08-01T19:00:00.000Z".to_string(),
        };
        storage.save_preferences(&user, &prefs).await.unwrap();

        let loaded = storage.get_preferences(&user).await.unwrap();
        assert_eq!(loaded, Some(prefs));

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn search_through_adapter_applies_area_filter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("search_adapter.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        let restaurant = Restaurant {
            id: "r1".to_string(),
            name: "Som Tum House".to_string(),
            cuisine: "Thai".to_string(),
            address: "45 Smith St".to_string(),
            area: "Brooklyn".to_string(),
            rating: 4.6,
            review_count: 212,
            zip_code: Some("11201".to_string()),
        };
        storage.insert_restaurant(&restaurant).await.unwrap();

        let hits = storage.search("thai", Some("brooklyn"), 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Som Tum House");

        let misses = storage.search("thai", Some("manhattan"), 5).await.unwrap();
        assert!(misses.is_empty());

        storage.close().await.unwrap();
    }
}
