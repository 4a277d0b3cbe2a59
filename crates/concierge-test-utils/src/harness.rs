// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete conversation stack over a temp
//! SQLite database: storage, dialogue engine, conversation host, and a
//! mock mailer. Provides `send_message()` to drive full turns in tests.

use std::sync::Arc;

use concierge_agent::host::ConversationHost;
use concierge_config::model::{DialogConfig, StorageConfig};
use concierge_core::types::Restaurant;
use concierge_core::{ConciergeError, StorageAdapter};
use concierge_dialog::DialogEngine;
use concierge_storage::SqliteStorage;

use crate::mock_mailer::MockMailer;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    restaurants: Vec<Restaurant>,
    failing_mailer: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            restaurants: Vec::new(),
            failing_mailer: false,
        }
    }

    /// Seed the restaurant index before the harness is handed out.
    pub fn with_restaurants(mut self, restaurants: Vec<Restaurant>) -> Self {
        self.restaurants = restaurants;
        self
    }

    /// Start with a mailer that rejects every delivery.
    pub fn with_failing_mailer(mut self) -> Self {
        self.failing_mailer = true;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, ConciergeError> {
        // Create temp directory for SQLite
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| ConciergeError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        // Initialize SQLite storage
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
        }));
        storage.initialize().await?;

        for restaurant in &self.restaurants {
            storage.insert_restaurant(restaurant).await?;
        }

        let mailer = Arc::new(MockMailer::new());
        if self.failing_mailer {
            mailer.set_failing(true);
        }

        let dialog_config = DialogConfig::default();
        let engine = DialogEngine::new(storage.clone(), storage.clone(), dialog_config.clone());
        let host = ConversationHost::new(storage.clone(), engine, dialog_config);

        Ok(TestHarness {
            storage,
            mailer,
            host,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
///
/// The storage handle is the concrete [`SqliteStorage`] so tests can
/// assert on queue and preference state through the adapter traits and
/// seed the restaurant index directly.
pub struct TestHarness {
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// The mock mailer, shared with any worker under test.
    pub mailer: Arc<MockMailer>,
    host: ConversationHost,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run one conversation turn for `sender_id` and return the reply.
    ///
    /// Conversation state persists across calls, so scripted multi-turn
    /// tests read like the dialogue they exercise.
    pub async fn send_message(
        &mut self,
        sender_id: &str,
        text: &str,
    ) -> Result<String, ConciergeError> {
        self.host.process(sender_id, "mock", text).await
    }
}
