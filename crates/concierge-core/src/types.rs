// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Concierge service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Unique identifier for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Stable identifier for a user, derived from their session key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the component registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Queue,
    Search,
    Mailer,
}

/// An inbound message received from a channel adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Opaque identifier of the sender on the originating channel.
    pub sender_id: String,
    /// Name of the channel the message arrived on (e.g. "http", "cli").
    pub channel: String,
    /// The raw user utterance.
    pub content: String,
    /// Correlation id assigned by the channel, echoed back on the reply.
    pub request_id: Option<String>,
}

/// An outbound message to be sent via a channel adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Session the reply belongs to, when known.
    pub session_id: Option<String>,
    /// Name of the channel to deliver on.
    pub channel: String,
    /// The reply text shown to the user.
    pub content: String,
    /// Correlation id copied from the inbound message.
    pub request_id: Option<String>,
}

/// A conversation session row.
///
/// `attributes` carries the dialog layer's serialized state as an opaque
/// JSON blob; storage never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub channel: String,
    pub user_id: Option<String>,
    pub state: String,
    pub attributes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A durable queue entry awaiting fulfillment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: i64,
    pub queue_name: String,
    pub payload: String,
    pub status: String,
    pub attempts: i32,
    pub max_attempts: i32,
    pub created_at: String,
    pub updated_at: String,
    pub locked_until: Option<String>,
}

/// A fully collected restaurant search request, ready for fulfillment.
///
/// `dining_date` and `dining_time` keep the user's validated phrasing
/// ("tomorrow", "7 pm") so the confirmation email can echo it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub location: String,
    pub cuisine: String,
    pub dining_date: String,
    pub dining_time: String,
    pub party_size: u32,
    pub email: String,
    /// RFC 3339 timestamp of when the request was accepted.
    pub requested_at: String,
}

/// A user's remembered search criteria from their most recent completed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub location: String,
    pub cuisine: String,
    pub email: String,
    pub party_size: u32,
    /// RFC 3339 timestamp of the last completed search.
    pub last_search_at: String,
}

/// A restaurant record from the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub address: String,
    /// Canonical neighborhood the restaurant belongs to (e.g. "Brooklyn").
    pub area: String,
    pub rating: f64,
    pub review_count: i64,
    pub zip_code: Option<String>,
}
