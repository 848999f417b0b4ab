// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order, later wins: compiled defaults, `/etc/saucebot/saucebot.toml`,
//! `~/.config/saucebot/saucebot.toml`, `./saucebot.toml`, `SAUCEBOT_*` env vars.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SaucebotConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/saucebot/saucebot.toml";
pub(crate) const LOCAL_CONFIG: &str = "saucebot.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("saucebot/saucebot.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<SaucebotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SaucebotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SaucebotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SaucebotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SaucebotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SaucebotConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Env provider mapping `SAUCEBOT_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `map()` rather than `split("_")`: keys such as `bot_token` contain
/// underscores and must stay intact.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("SAUCEBOT_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to its dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: &[&str] = &["bot", "telegram", "fuzzysearch", "e621", "storage"];
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
