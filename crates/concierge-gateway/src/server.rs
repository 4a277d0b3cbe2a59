// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tower_http::cors::CorsLayer;

use concierge_core::types::InboundMessage;
use concierge_core::ConciergeError;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Channel for sending inbound messages to the agent loop.
    pub inbound_tx: mpsc::Sender<InboundMessage>,
    /// Map of request_id -> oneshot sender for HTTP response routing.
    pub response_map: Arc<DashMap<String, oneshot::Sender<String>>>,
    /// Process start time for uptime reporting.
    pub started_at: std::time::Instant,
}

/// Gateway server configuration (mirrors GatewayConfig from concierge-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub bind_address: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the gateway router.
///
/// Routes:
/// - POST /v1/chat (conversation endpoint)
/// - GET /health (liveness probe)
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/chat", post(handlers::post_chat))
        .route("/health", get(handlers::get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Binds to the configured address:port and serves until the task is
/// aborted by [`HttpChannel::shutdown`](crate::HttpChannel).
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), ConciergeError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ConciergeError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| ConciergeError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
