// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `saucebot check-config` command implementation.

use saucebot_config::model::SaucebotConfig;
use saucebot_config::{render_errors, validate_serve_requirements};

/// Prints the effective settings and reports whether `serve` could start.
pub fn run_check_config(config: &SaucebotConfig) -> bool {
    println!();
    println!("  saucebot check-config");
    println!("  {}", "-".repeat(50));
    for (key, value) in summary(config) {
        println!("  {key:<28} {value}");
    }
    println!();

    match validate_serve_requirements(config) {
        Ok(()) => {
            println!("  configuration OK");
            true
        }
        Err(errors) => {
            render_errors(&errors);
            false
        }
    }
}

fn secret(value: &Option<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => "set".to_string(),
        _ => "missing".to_string(),
    }
}

/// Effective settings as key/value rows. Secrets only show whether they are set.
fn summary(config: &SaucebotConfig) -> Vec<(&'static str, String)> {
    vec![
        ("bot.log_level", config.bot.log_level.clone()),
        ("bot.photo_dir", config.bot.photo_dir.clone()),
        ("bot.max_distance", config.bot.max_distance.to_string()),
        (
            "bot.admin_chat_id",
            config
                .bot
                .admin_chat_id
                .map_or_else(|| "none".to_string(), |id| id.to_string()),
        ),
        (
            "bot.favorite_callback",
            format!("{:?}", config.bot.favorite_callback),
        ),
        ("bot.sentry_dsn", secret(&config.bot.sentry_dsn)),
        ("telegram.bot_token", secret(&config.telegram.bot_token)),
        ("fuzzysearch.api_key", secret(&config.fuzzysearch.api_key)),
        ("fuzzysearch.endpoint", config.fuzzysearch.endpoint.clone()),
        ("e621.base_url", config.e621.base_url.clone()),
        ("storage.database_path", config.storage.database_path.clone()),
    ]
}
