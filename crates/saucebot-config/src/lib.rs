// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for saucebot.
//!
//! TOML files layered with `SAUCEBOT_*` environment overrides, strict
//! unknown-key rejection, and miette diagnostics with typo suggestions.
//!
//! ```no_run
//! let config = saucebot_config::load_and_validate().expect("config errors");
//! println!("photos go to {}", config.bot.photo_dir);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{FavoriteCallback, SaucebotConfig};
pub use validation::{validate_config, validate_serve_requirements};

/// Loads the layered configuration and validates it.
pub fn load_and_validate() -> Result<SaucebotConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Loads one explicit file (plus env overrides) and validates it.
pub fn load_and_validate_path(path: &Path) -> Result<SaucebotConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Loads configuration from a TOML string and validates it.
pub fn load_and_validate_str(toml_content: &str) -> Result<SaucebotConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

fn finish(
    loaded: Result<SaucebotConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<SaucebotConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources())),
    }
}

fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    Some((path.display().to_string(), content))
}

/// Contents of every config file in the hierarchy that exists, for spans.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![Path::new(loader::SYSTEM_CONFIG).to_path_buf()];
    candidates.extend(loader::user_config_path());
    candidates.push(Path::new(loader::LOCAL_CONFIG).to_path_buf());
    candidates.iter().filter_map(|p| read_source(p)).collect()
}
