// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway implementing ChannelAdapter.
//!
//! The gateway provides REST access to the conversation engine. By
//! implementing the same ChannelAdapter trait as any other channel, the
//! gateway reuses the entire agent loop and session management.

pub mod handlers;
pub mod server;

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{mpsc, Mutex};

use concierge_core::types::{InboundMessage, OutboundMessage};
use concierge_core::{AdapterType, ChannelAdapter, ComponentAdapter, ConciergeError, HealthStatus, MessageId};

use crate::server::{GatewayState, ServerConfig};

/// HTTP channel adapter configuration.
///
/// Mirrors `GatewayConfig` from `concierge-config` to avoid a dependency on
/// the config crate from the gateway crate.
#[derive(Debug, Clone)]
pub struct HttpChannelConfig {
    /// Host address to bind.
    pub bind_address: String,
    /// Port to bind.
    pub port: u16,
}

/// HTTP gateway implementing ChannelAdapter.
///
/// The gateway runs an axum server as a background task. HTTP handlers create
/// InboundMessages and push them to an mpsc channel. HttpChannel::receive()
/// reads from this channel, and HttpChannel::send() routes replies back to
/// waiting HTTP handlers via oneshot channels.
pub struct HttpChannel {
    config: HttpChannelConfig,
    inbound_tx: mpsc::Sender<InboundMessage>,
    inbound_rx: Mutex<mpsc::Receiver<InboundMessage>>,
    response_map: Arc<DashMap<String, tokio::sync::oneshot::Sender<String>>>,
    server_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl HttpChannel {
    /// Create a new HttpChannel.
    pub fn new(config: HttpChannelConfig) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::channel(256);
        Self {
            config,
            inbound_tx,
            inbound_rx: Mutex::new(inbound_rx),
            response_map: Arc::new(DashMap::new()),
            server_handle: Mutex::new(None),
        }
    }
}

#[async_trait]
impl ComponentAdapter for HttpChannel {
    fn name(&self) -> &str {
        "http"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        let handle = self.server_handle.lock().await;
        if handle.is_some() {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy("server not started".to_string()))
        }
    }

    async fn shutdown(&self) -> Result<(), ConciergeError> {
        let mut handle = self.server_handle.lock().await;
        if let Some(h) = handle.take() {
            h.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for HttpChannel {
    async fn connect(&mut self) -> Result<(), ConciergeError> {
        let server_config = ServerConfig {
            bind_address: self.config.bind_address.clone(),
            port: self.config.port,
        };

        let state = GatewayState {
            inbound_tx: self.inbound_tx.clone(),
            response_map: Arc::clone(&self.response_map),
            started_at: std::time::Instant::now(),
        };

        let handle = tokio::spawn(async move {
            if let Err(e) = server::start_server(&server_config, state).await {
                tracing::error!("gateway server error: {e}");
            }
        });

        let mut server_handle = self.server_handle.lock().await;
        *server_handle = Some(handle);

        tracing::info!(
            "HTTP channel connected on {}:{}",
            self.config.bind_address,
            self.config.port
        );
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, ConciergeError> {
        let request_id = msg.request_id.as_deref().unwrap_or("");

        if !request_id.is_empty() {
            if let Some((_, sender)) = self.response_map.remove(request_id) {
                let _ = sender.send(msg.content);
                return Ok(MessageId(request_id.to_string()));
            }
        }

        // The waiting handler is gone, usually because the request timed out.
        tracing::warn!(request_id, "no waiting handler for reply, dropping");
        Ok(MessageId(request_id.to_string()))
    }

    async fn receive(&self) -> Result<InboundMessage, ConciergeError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| ConciergeError::Channel {
            message: "http inbound channel closed".to_string(),
            source: None,
        })
    }
}
