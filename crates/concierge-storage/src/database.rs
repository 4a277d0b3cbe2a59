// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use concierge_core::ConciergeError;
use tracing::debug;

/// Convert a tokio-rusqlite error into ConciergeError::Storage.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> ConciergeError {
    ConciergeError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the service database.
///
/// Wraps a single `tokio_rusqlite::Connection`. All query modules accept
/// `&Database` and go through [`Database::connection`], which serializes
/// every call on one background thread and eliminates SQLITE_BUSY under
/// concurrent access.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, ConciergeError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConciergeError::Storage {
                source: Box::new(e),
            })?;
        }

        // Migrations run on a short-lived blocking connection before the
        // async handle opens; refinery drives a plain rusqlite::Connection.
        let migration_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), ConciergeError> {
            let mut conn =
                rusqlite::Connection::open(&migration_path).map_err(|e| {
                    ConciergeError::Storage {
                        source: Box::new(e),
                    }
                })?;
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| ConciergeError::Internal(format!("migration task panicked: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| ConciergeError::Storage {
                source: Box::new(e),
            })?;

        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying connection for query execution.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), ConciergeError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        self.conn.close().await.map_err(|e| ConciergeError::Storage {
            source: Box::new(e),
        })?;
        debug!("database closed");
        Ok(())
    }
}
