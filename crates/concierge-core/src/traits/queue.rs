// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request queue trait with at-least-once delivery semantics.

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::ComponentAdapter;
use crate::types::{QueueEntry, SearchRequest};

/// Adapter for the durable fulfillment request queue.
///
/// Delivery is at-least-once: a dequeued entry is leased, not removed.
/// The consumer must `ack` after successful processing or `fail` to
/// release it for redelivery. Entries whose lease expires without an ack
/// become eligible for dequeue again.
#[async_trait]
pub trait RequestQueue: ComponentAdapter {
    /// Enqueues a search request for fulfillment. Returns the entry id.
    async fn enqueue(&self, request: &SearchRequest) -> Result<i64, ConciergeError>;

    /// Leases the next available entry, or `None` if the queue is empty.
    async fn dequeue(&self) -> Result<Option<QueueEntry>, ConciergeError>;

    /// Acknowledges successful processing, removing the entry from delivery.
    async fn ack(&self, id: i64) -> Result<(), ConciergeError>;

    /// Records a processing failure, releasing the entry for retry until
    /// its attempt budget is exhausted.
    async fn fail(&self, id: i64) -> Result<(), ConciergeError>;
}
