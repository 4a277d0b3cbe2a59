// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/chat and GET /health.

use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use concierge_core::types::InboundMessage;

use crate::server::GatewayState;

/// How long to wait for the agent loop to accept an inbound message.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);
/// How long to wait for the conversation engine to produce a reply.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(120);
/// Header carrying the conversation session id across requests.
pub const SESSION_HEADER: &str = "x-session-id";

/// Request body for POST /v1/chat.
///
/// Clients send a list of messages, each wrapping its text in an
/// `unstructured` object. Only the first message of a request is processed.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Messages in this chat turn.
    #[serde(default)]
    pub messages: Vec<InboundChatMessage>,
}

/// A single client message in a [`ChatRequest`].
#[derive(Debug, Deserialize)]
pub struct InboundChatMessage {
    /// Free-form text payload.
    #[serde(default)]
    pub unstructured: Option<Unstructured>,
}

/// Free-form text payload shared by requests and responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct Unstructured {
    /// The message text.
    #[serde(default)]
    pub text: String,
}

/// Response body for POST /v1/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Reply messages, in order.
    pub messages: Vec<OutboundChatMessage>,
}

/// A single reply message in a [`ChatResponse`].
#[derive(Debug, Serialize)]
pub struct OutboundChatMessage {
    /// Message kind, always "unstructured".
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form text payload.
    pub unstructured: Unstructured,
}

impl ChatResponse {
    /// Wrap one reply text in the wire envelope.
    pub fn single(text: String) -> Self {
        Self {
            messages: vec![OutboundChatMessage {
                kind: "unstructured".to_string(),
                unstructured: Unstructured { text },
            }],
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Error description.
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
}

/// POST /v1/chat
///
/// Accepts a chat turn, routes it through the agent loop, and returns the
/// engine's reply in the same envelope. The session id is read from the
/// x-session-id header, generated when absent, and echoed on the response
/// so clients can thread the conversation.
pub async fn post_chat(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<ChatRequest>,
) -> Response {
    let Some(first) = body.messages.first() else {
        return error_response(StatusCode::BAD_REQUEST, "No message provided");
    };
    let text = first
        .unstructured
        .as_ref()
        .map(|u| u.text.trim())
        .unwrap_or("");
    if text.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Empty message");
    }

    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let request_id = uuid::Uuid::new_v4().to_string();
    let inbound = InboundMessage {
        sender_id: session_id.clone(),
        channel: "http".to_string(),
        content: text.to_string(),
        request_id: Some(request_id.clone()),
    };

    // Create oneshot channel for response routing.
    let (tx, rx) = oneshot::channel::<String>();
    state.response_map.insert(request_id.clone(), tx);

    // Send to inbound channel (with timeout).
    match tokio::time::timeout(SEND_TIMEOUT, state.inbound_tx.send(inbound)).await {
        Ok(Ok(())) => {}
        Ok(Err(_)) => {
            state.response_map.remove(&request_id);
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "agent loop not accepting messages",
            );
        }
        Err(_) => {
            state.response_map.remove(&request_id);
            return error_response(StatusCode::SERVICE_UNAVAILABLE, "inbound channel full");
        }
    }

    // Wait for the engine's reply.
    match tokio::time::timeout(RESPONSE_TIMEOUT, rx).await {
        Ok(Ok(reply)) => {
            let mut response = (StatusCode::OK, Json(ChatResponse::single(reply))).into_response();
            if let Ok(value) = HeaderValue::from_str(&session_id) {
                response.headers_mut().insert(SESSION_HEADER, value);
            }
            response
        }
        Ok(Err(_)) => {
            // Sender dropped (agent loop crashed or disconnected).
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "response channel closed")
        }
        Err(_) => {
            state.response_map.remove(&request_id);
            error_response(
                StatusCode::GATEWAY_TIMEOUT,
                &format!("response timeout ({}s)", RESPONSE_TIMEOUT.as_secs()),
            )
        }
    }
}

/// GET /health
///
/// Liveness probe, also reporting version and uptime.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
        .into_response()
}
