// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `concierge chat` command implementation.
//!
//! Launches an interactive REPL over the conversation engine with a
//! colored prompt and readline history. The REPL drives the same dialog
//! stack as the HTTP gateway, so a scripted conversation behaves
//! identically on both. Completed searches are enqueued for the serve
//! worker to deliver.

use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use concierge_agent::host::ConversationHost;
use concierge_config::model::ConciergeConfig;
use concierge_core::{ConciergeError, StorageAdapter};
use concierge_dialog::DialogEngine;
use concierge_storage::SqliteStorage;

/// Runs the `concierge chat` interactive REPL.
///
/// Conversation state persists in storage between turns and across
/// invocations, so a suggestion flow can be resumed after quitting.
pub async fn run_chat(config: ConciergeConfig) -> Result<(), ConciergeError> {
    // Initialize storage.
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);

    // Build the conversation stack.
    let engine = DialogEngine::new(storage.clone(), storage.clone(), config.dialog.clone());
    let mut host = ConversationHost::new(storage.clone(), engine, config.dialog.clone());

    // Set up readline editor.
    let mut rl = DefaultEditor::new()
        .map_err(|e| ConciergeError::Internal(format!("failed to initialize readline: {e}")))?;

    // Print welcome message.
    println!("{}", "concierge chat".bold().green());
    println!("Type {} to exit.\n", "/quit".yellow());

    // REPL loop.
    let prompt = format!("{}> ", "concierge".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match host.process("local", "cli", trimmed).await {
                    Ok(reply) => println!("{reply}"),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    storage.close().await?;

    println!("{}", "goodbye".dimmed());
    Ok(())
}
