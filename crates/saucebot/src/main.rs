// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Saucebot - finds the source of furry art posted to Telegram.
//!
//! This is the binary entry point.

mod check_config;
mod serve;

use std::path::PathBuf;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

/// Saucebot - finds the source of furry art posted to Telegram.
#[derive(Parser, Debug)]
#[command(name = "saucebot", version, about, long_about = None)]
struct Cli {
    /// Read this config file instead of the default search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Connect to Telegram and answer photos until interrupted.
    Serve,
    /// Validate the configuration and print the effective settings.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // .env values count as environment overrides.
    dotenvy::dotenv().ok();

    let loaded = match &cli.config {
        Some(path) => saucebot_config::load_and_validate_path(path),
        None => saucebot_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            saucebot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            if !check_config::run_check_config(&config) {
                std::process::exit(1);
            }
        }
        None => {
            println!("saucebot: use --help for available commands");
        }
    }
}
