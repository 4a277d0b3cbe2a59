// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for user-facing message transports (HTTP, CLI).

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::ComponentAdapter;
use crate::types::{InboundMessage, MessageId, OutboundMessage};

/// Adapter for bidirectional messaging channel integrations.
///
/// Channel adapters connect Concierge to the outside world, handling
/// message ingestion and reply delivery.
#[async_trait]
pub trait ChannelAdapter: ComponentAdapter {
    /// Establishes the channel's transport (binds sockets, opens streams).
    async fn connect(&mut self) -> Result<(), ConciergeError>;

    /// Sends a reply through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, ConciergeError>;

    /// Receives the next inbound message from the channel.
    async fn receive(&self) -> Result<InboundMessage, ConciergeError>;
}
