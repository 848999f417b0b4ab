// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! Both entry points collect every problem instead of stopping at the first.

use crate::diagnostic::ConfigError;
use crate::model::SaucebotConfig;

/// Largest hash distance worth asking for; hashes are 64 bits wide.
const MAX_HASH_DISTANCE: u32 = 64;

/// Validates value ranges and shapes. Secrets are not required here.
pub fn validate_config(config: &SaucebotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    if config.storage.database_path.trim().is_empty() {
        invalid("storage.database_path must not be empty".into());
    }
    if config.bot.photo_dir.trim().is_empty() {
        invalid("bot.photo_dir must not be empty".into());
    }
    if config.bot.max_distance > MAX_HASH_DISTANCE {
        invalid(format!(
            "bot.max_distance must be at most {MAX_HASH_DISTANCE}, got {}",
            config.bot.max_distance
        ));
    }
    if config.bot.session_ttl_secs == 0 {
        invalid("bot.session_ttl_secs must be greater than 0".into());
    }
    if config.bot.session_capacity == 0 {
        invalid("bot.session_capacity must be greater than 0".into());
    }

    if let Some(dsn) = &config.bot.sentry_dsn
        && !dsn.trim().is_empty()
        && !(dsn.starts_with("http://") || dsn.starts_with("https://"))
    {
        invalid("bot.sentry_dsn must be an http(s) URL".into());
    }

    for (key, url) in [
        ("fuzzysearch.endpoint", &config.fuzzysearch.endpoint),
        ("e621.base_url", &config.e621.base_url),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            invalid(format!("{key} must be an http(s) URL, got `{url}`"));
        }
    }

    if config.e621.user_agent.trim().is_empty() {
        invalid("e621.user_agent must not be empty".into());
    }
    for (key, secs) in [
        ("fuzzysearch.timeout_secs", config.fuzzysearch.timeout_secs),
        ("e621.timeout_secs", config.e621.timeout_secs),
        ("e621.liveness_timeout_secs", config.e621.liveness_timeout_secs),
    ] {
        if secs == 0 {
            invalid(format!("{key} must be greater than 0"));
        }
    }
    if !(1..=20).contains(&config.e621.favorites_pages) {
        invalid(format!(
            "e621.favorites_pages must be between 1 and 20, got {}",
            config.e621.favorites_pages
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Checks the secrets `serve` cannot start without.
pub fn validate_serve_requirements(config: &SaucebotConfig) -> Result<(), Vec<ConfigError>> {
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());

    let mut errors = Vec::new();
    if blank(&config.telegram.bot_token) {
        errors.push(ConfigError::missing("telegram.bot_token"));
    }
    if blank(&config.fuzzysearch.api_key) {
        errors.push(ConfigError::missing("fuzzysearch.api_key"));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
