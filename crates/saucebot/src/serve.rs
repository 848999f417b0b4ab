// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `saucebot serve` command implementation.
//!
//! Opens SQLite storage, connects the Telegram adapter, builds the bot
//! agent and long-polls until Ctrl-C. Storage is closed on the way out even
//! when polling fails. With `bot.sentry_dsn` set, panics and `error!` events
//! are also reported to Sentry.

use std::sync::Arc;

use saucebot_agent::BotAgent;
use saucebot_config::model::SaucebotConfig;
use saucebot_config::{render_errors, validate_serve_requirements};
use saucebot_core::{SauceError, StorageAdapter};
use saucebot_storage::SqliteStorage;
use saucebot_telegram::TelegramPlatform;
use tracing::{info, warn};

/// Runs the `saucebot serve` command.
pub async fn run_serve(config: SaucebotConfig) -> Result<(), SauceError> {
    if let Err(errors) = validate_serve_requirements(&config) {
        render_errors(&errors);
        return Err(SauceError::Config(
            "serve requires telegram.bot_token and fuzzysearch.api_key".into(),
        ));
    }

    // Flushes pending Sentry events when dropped.
    let sentry_guard = init_error_reporting(&config);
    init_tracing(&config.bot.log_level, sentry_guard.is_some());

    info!(sentry = sentry_guard.is_some(), "starting saucebot serve");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
    info!(
        database = %config.storage.database_path,
        "storage initialized"
    );

    let platform = TelegramPlatform::new(&config.telegram)?;
    let bot = platform.bot().clone();
    let agent = BotAgent::from_config(&config, Arc::new(platform), Arc::clone(&storage))?;

    let result = saucebot_telegram::run(bot, Arc::new(agent)).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage");
    }
    info!("saucebot stopped");
    result
}

/// The configured Sentry DSN; blank counts as unset.
fn sentry_dsn(config: &SaucebotConfig) -> Option<&str> {
    config
        .bot
        .sentry_dsn
        .as_deref()
        .map(str::trim)
        .filter(|dsn| !dsn.is_empty())
}

/// Starts the Sentry client when a DSN is configured.
///
/// An unparsable DSN disables reporting with a warning instead of failing
/// startup.
fn init_error_reporting(config: &SaucebotConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = match sentry_dsn(config)?.parse::<sentry::types::Dsn>() {
        Ok(dsn) => dsn,
        Err(e) => {
            eprintln!("warning: invalid bot.sentry_dsn ({e}), error reporting disabled");
            return None;
        }
    };
    Some(sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        ..Default::default()
    }))
}

/// Initialize the tracing subscriber with the configured log level.
///
/// With Sentry enabled, `error!` events become Sentry events and lower
/// levels are kept as breadcrumbs.
fn init_tracing(log_level: &str, sentry: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("saucebot={log_level},warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_names(false),
        )
        .with(sentry.then(sentry_tracing::layer))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_dsn_disables_reporting() {
        let mut config = SaucebotConfig::default();
        assert_eq!(sentry_dsn(&config), None);
        config.bot.sentry_dsn = Some("   ".into());
        assert_eq!(sentry_dsn(&config), None);
        assert!(init_error_reporting(&config).is_none());
    }

    #[test]
    fn dsn_is_trimmed() {
        let mut config = SaucebotConfig::default();
        config.bot.sentry_dsn = Some(" https://key@o1.ingest.sentry.io/42 ".into());
        assert_eq!(sentry_dsn(&config), Some("https://key@o1.ingest.sentry.io/42"));
    }

    #[test]
    fn unparsable_dsn_disables_reporting() {
        let mut config = SaucebotConfig::default();
        config.bot.sentry_dsn = Some("https://no-project-id".into());
        assert!(init_error_reporting(&config).is_none());
    }
}
