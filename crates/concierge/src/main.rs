// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concierge - a conversational restaurant-suggestion service.
//!
//! This is the binary entry point for the Concierge service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod chat;
mod serve;

use clap::{Parser, Subcommand};

/// Concierge - a conversational restaurant-suggestion service.
#[derive(Parser, Debug)]
#[command(name = "concierge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Concierge service (gateway, agent loop, and worker).
    Serve,
    /// Launch an interactive chat session in the terminal.
    Chat,
    /// Manage Concierge configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate the configuration and report diagnostics.
    Validate,
    /// Print the configuration files consulted, in merge order.
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match concierge_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            concierge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Chat) => chat::run_chat(config).await,
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Validate => {
                println!("configuration ok (agent.name={})", config.agent.name);
                Ok(())
            }
            ConfigCommands::Path => {
                // Existing files are starred; later entries override earlier.
                for path in concierge_config::search_paths() {
                    let marker = if path.exists() { "*" } else { " " };
                    println!("{marker} {}", path.display());
                }
                Ok(())
            }
        },
        None => {
            println!("concierge: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
