// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for saucebot.

use thiserror::Error;

/// The primary error type used across saucebot crates.
///
/// External failures are converted into one of these variants at the point
/// of use. The chat-facing layer never shows them verbatim; it maps them to
/// a friendly reply instead.
#[derive(Debug, Error)]
pub enum SauceError {
    /// Configuration errors (missing token, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat platform errors (send, edit, file download).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The reverse-image-search call failed outright. No partial results exist.
    #[error("search failed: {message}")]
    Search {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The image-board API rejected or failed a request.
    #[error("image board error: {message}")]
    ImageBoard {
        message: String,
        status: Option<u16>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Local file hiccups unrelated to business logic (temp image handling).
    #[error("io error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SauceError {
    /// HTTP status reported by the image board, if the failure carried one.
    pub fn image_board_status(&self) -> Option<u16> {
        match self {
            SauceError::ImageBoard { status, .. } => *status,
            _ => None,
        }
    }
}

/// Why a credential check did not succeed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    /// Username or API key is missing.
    IncompleteInfo,
    /// The image board rejected the credentials (401/403).
    InvalidInfo,
    /// Anything else: network failure, unexpected status.
    Unknown,
}

/// Failure of a favoriting attempt.
#[derive(Debug, Error)]
pub enum FavoriteError {
    /// The user has not stored both a username and an API key.
    #[error("credentials incomplete (username missing: {missing_username}, key missing: {missing_key})")]
    IncompleteCredentials {
        missing_username: bool,
        missing_key: bool,
    },

    /// The image board call failed for any other reason.
    #[error("favorite failed: {0}")]
    Failed(#[source] SauceError),
}
