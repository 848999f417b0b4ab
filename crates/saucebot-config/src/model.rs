// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a typo in a config
//! file fails at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level saucebot configuration.
///
/// Every section is optional and falls back to its defaults. Secrets
/// (`telegram.bot_token`, `fuzzysearch.api_key`) have no default and are
/// checked by [`crate::validation::validate_serve_requirements`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SaucebotConfig {
    /// Bot behavior settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Reverse-image-search API settings.
    #[serde(default)]
    pub fuzzysearch: FuzzySearchConfig,

    /// e621 API settings.
    #[serde(default)]
    pub e621: E621Config,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// How the "add to favorites" button identifies the match it acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteCallback {
    /// The post id travels in the button payload (`addToFavorites:<id>`).
    #[default]
    PostId,
    /// The payload is bare; the match is looked up in the chat's search session.
    Session,
}

/// Bot behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for downloaded photos awaiting search.
    #[serde(default = "default_photo_dir")]
    pub photo_dir: String,

    /// Maximum hash distance accepted from the search API.
    #[serde(default = "default_max_distance")]
    pub max_distance: u32,

    /// Chat that receives `/submiterror` notifications. `None` disables forwarding.
    #[serde(default)]
    pub admin_chat_id: Option<i64>,

    /// Payload style of the favorite button.
    #[serde(default)]
    pub favorite_callback: FavoriteCallback,

    /// Seconds a chat's last search result stays available to the favorite button.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Maximum number of remembered search sessions.
    #[serde(default = "default_session_capacity")]
    pub session_capacity: usize,

    /// Sentry DSN for crash and error reporting. `None` disables reporting.
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            photo_dir: default_photo_dir(),
            max_distance: default_max_distance(),
            admin_chat_id: None,
            favorite_callback: FavoriteCallback::default(),
            session_ttl_secs: default_session_ttl_secs(),
            session_capacity: default_session_capacity(),
            sentry_dsn: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_photo_dir() -> String {
    "photos".to_string()
}

fn default_max_distance() -> u32 {
    2
}

fn default_session_ttl_secs() -> u64 {
    3600
}

fn default_session_capacity() -> usize {
    10_000
}

/// Telegram bot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token.
    #[serde(default)]
    pub bot_token: Option<String>,
}

/// FuzzySearch reverse-image-search API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FuzzySearchConfig {
    /// API key sent in the `x-api-key` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Image search endpoint.
    #[serde(default = "default_fuzzysearch_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_fuzzysearch_timeout")]
    pub timeout_secs: u64,
}

impl Default for FuzzySearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_fuzzysearch_endpoint(),
            timeout_secs: default_fuzzysearch_timeout(),
        }
    }
}

fn default_fuzzysearch_endpoint() -> String {
    "https://api-next.fuzzysearch.net/v1/image".to_string()
}

fn default_fuzzysearch_timeout() -> u64 {
    30
}

/// e621 image-board API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct E621Config {
    /// Site root; API paths and post links are built from it.
    #[serde(default = "default_e621_base_url")]
    pub base_url: String,

    /// User-Agent identifying the bot, required by the e621 API rules.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_e621_timeout")]
    pub timeout_secs: u64,

    /// Upper bound for the whole liveness pass of one search.
    #[serde(default = "default_liveness_timeout")]
    pub liveness_timeout_secs: u64,

    /// Pages of favorites fetched by `/analyzee621favs`.
    #[serde(default = "default_favorites_pages")]
    pub favorites_pages: u32,
}

impl Default for E621Config {
    fn default() -> Self {
        Self {
            base_url: default_e621_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_e621_timeout(),
            liveness_timeout_secs: default_liveness_timeout(),
            favorites_pages: default_favorites_pages(),
        }
    }
}

fn default_e621_base_url() -> String {
    "https://e621.net".to_string()
}

fn default_user_agent() -> String {
    "saucebot/0.1 (Telegram reverse image search bot)".to_string()
}

fn default_e621_timeout() -> u64 {
    15
}

fn default_liveness_timeout() -> u64 {
    10
}

fn default_favorites_pages() -> u32 {
    4
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "saucebot.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}
