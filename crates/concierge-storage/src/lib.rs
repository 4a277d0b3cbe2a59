// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the concierge agent.
//!
//! Owns the database handle, schema migrations, and the typed query
//! modules behind the storage traits. All access goes through
//! [`tokio_rusqlite`] so queries never block the async runtime, and the
//! single background connection serializes writers so concurrent tasks
//! cannot race each other into `SQLITE_BUSY`.
//!
//! What lives here:
//! - sessions: one row per conversation, carrying the serialized dialog
//!   state in the `attributes` column
//! - preferences: last confirmed search per user, keyed by user id
//! - queue: durable fulfillment requests with at-least-once delivery
//! - restaurants: the searchable restaurant index
//!
//! [`SqliteStorage`] is the adapter the rest of the system holds; it
//! implements every persistence-facing trait from `concierge-core`.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
pub use models::{QueueEntry, Restaurant, Session, UserPreferences};
