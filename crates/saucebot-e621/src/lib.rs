// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! e621 integration for saucebot.
//!
//! [`E621Client`] speaks the HTTP API. The other modules build the bot's
//! credential-aware operations on top of it: validating a user's login,
//! dropping deleted posts from search results, adding favorites and
//! summarising a user's favorite tags.

pub mod analysis;
pub mod client;
pub mod favorites;
pub mod liveness;
pub mod types;
pub mod validator;

pub use analysis::{TagCount, top_tags};
pub use client::E621Client;
pub use favorites::FavoritesClient;
pub use liveness::{LivenessReport, Unverified, filter_live};
pub use types::Post;
pub use validator::CredentialValidator;
