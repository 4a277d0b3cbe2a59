// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `concierge serve` command implementation.
//!
//! Starts the full service: SQLite storage, the HTTP gateway channel,
//! the dialog engine behind the agent loop, and the fulfillment worker.
//! Supports graceful shutdown via signal handlers.

use std::sync::Arc;

use tracing::{info, warn};

use concierge_agent::host::ConversationHost;
use concierge_agent::{shutdown, AgentLoop};
use concierge_config::model::ConciergeConfig;
use concierge_core::{ChannelAdapter, ConciergeError, StorageAdapter};
use concierge_dialog::DialogEngine;
use concierge_gateway::{HttpChannel, HttpChannelConfig};
use concierge_mailer::SmtpMailer;
use concierge_storage::SqliteStorage;
use concierge_worker::FulfillmentWorker;

/// Runs the `concierge serve` command.
///
/// Initializes storage, connects the HTTP gateway, spawns the fulfillment
/// worker, and enters the main agent loop until a shutdown signal arrives.
pub async fn run_serve(config: ConciergeConfig) -> Result<(), ConciergeError> {
    // Initialize tracing subscriber.
    init_tracing(&config.agent.log_level);

    info!("starting concierge serve");

    // Initialize storage.
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);

    // Mark sessions left active by a previous crash.
    let stale = storage.mark_stale_sessions().await?;
    if stale > 0 {
        info!(count = stale, "marked stale sessions as interrupted");
    }

    // Initialize the SMTP mailer. A bad relay or from-address fails here,
    // not on the first delivery.
    let mailer = Arc::new(SmtpMailer::new(&config.smtp)?);

    // Initialize and connect the HTTP gateway channel.
    let mut channel = HttpChannel::new(HttpChannelConfig {
        bind_address: config.gateway.bind_address.clone(),
        port: config.gateway.port,
    });
    channel.connect().await?;

    // Build the conversation stack.
    let engine = DialogEngine::new(storage.clone(), storage.clone(), config.dialog.clone());
    let host = ConversationHost::new(storage.clone(), engine, config.dialog.clone());

    // Build the fulfillment worker over the same storage-backed adapters.
    let worker = FulfillmentWorker::new(
        storage.clone(),
        storage.clone(),
        mailer,
        config.worker.clone(),
    );

    // Install signal handler.
    let cancel = shutdown::install_signal_handler();

    // Spawn the fulfillment worker background task.
    let worker_cancel = cancel.clone();
    let worker_handle = tokio::spawn(async move {
        worker.run(worker_cancel).await;
    });
    info!(
        poll_interval_secs = config.worker.poll_interval_secs,
        "fulfillment worker started"
    );

    // Create and run the agent loop until shutdown.
    let mut agent_loop = AgentLoop::new(Box::new(channel), host);
    agent_loop.run(cancel).await?;

    if let Err(e) = worker_handle.await {
        warn!(error = %e, "fulfillment worker task join failed");
    }

    storage.close().await?;

    info!("concierge serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("concierge={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
