// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent loop and conversation hosting for the Concierge service.
//!
//! The [`AgentLoop`] is the channel-facing coordinator that:
//! - Receives messages from a channel adapter
//! - Runs each one through the [`host::ConversationHost`] pipeline
//! - Sends the reply back through the channel
//! - Handles graceful shutdown
//!
//! The per-turn pipeline lives in [`host`] so the interactive chat shell
//! can drive conversations without a channel in between.

pub mod host;
pub mod nlu;
pub mod session;
pub mod shutdown;

use concierge_core::types::{InboundMessage, OutboundMessage};
use concierge_core::{ChannelAdapter, ConciergeError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::host::ConversationHost;

/// The main agent loop coordinating message flow between the channel and
/// the conversation host.
pub struct AgentLoop {
    channel: Box<dyn ChannelAdapter + Send + Sync>,
    host: ConversationHost,
}

impl AgentLoop {
    /// Creates a new agent loop over an already-connected channel.
    pub fn new(channel: Box<dyn ChannelAdapter + Send + Sync>, host: ConversationHost) -> Self {
        info!("agent loop initialized");
        Self { channel, host }
    }

    /// Runs the main agent loop until the cancellation token is triggered.
    ///
    /// The loop:
    /// 1. Waits for inbound messages from the channel
    /// 2. Runs each through the conversation pipeline
    /// 3. Sends the reply back to the channel
    ///
    /// A turn already in flight finishes before cancellation is observed.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), ConciergeError> {
        info!("agent loop running");

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => {
                            if let Err(e) = self.handle_inbound(inbound).await {
                                error!(error = %e, "failed to handle inbound message");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            // If the channel is closed, break out of the loop.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        self.channel.shutdown().await?;

        info!("agent loop stopped");
        Ok(())
    }

    /// Handles a single inbound message: runs the turn and sends the reply.
    async fn handle_inbound(&mut self, inbound: InboundMessage) -> Result<(), ConciergeError> {
        debug!(
            sender_id = inbound.sender_id.as_str(),
            channel = inbound.channel.as_str(),
            "handling inbound message"
        );

        let reply = self
            .host
            .process(&inbound.sender_id, &inbound.channel, &inbound.content)
            .await?;

        let out = OutboundMessage {
            session_id: Some(inbound.sender_id.clone()),
            channel: inbound.channel.clone(),
            content: reply,
            request_id: inbound.request_id.clone(),
        };
        self.channel.send(out).await?;

        Ok(())
    }
}
