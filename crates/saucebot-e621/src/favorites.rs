// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adds a post to a user's e621 favorites with their stored login.

use saucebot_core::types::{Credentials, FavoriteOutcome, UserId};
use saucebot_core::{CredentialStore, FavoriteError, SauceError};
use tracing::{error, info};

use crate::client::E621Client;

/// e621's answer when the post is already a favorite.
pub const ALREADY_FAVORITED: &str = "You have already favorited this post";

#[derive(Clone)]
pub struct FavoritesClient {
    client: E621Client,
    store: CredentialStore,
}

impl FavoritesClient {
    pub fn new(client: E621Client, store: CredentialStore) -> Self {
        Self { client, store }
    }

    /// Favorites `external_id` for `user_id`.
    ///
    /// Failures other than missing credentials are logged here; callers
    /// only show a generic message.
    pub async fn add_favorite(
        &self,
        user_id: UserId,
        external_id: &str,
    ) -> Result<FavoriteOutcome, FavoriteError> {
        let record = self.store.get(user_id).await.map_err(|e| {
            error!(user_id = user_id.0, error = %e, "credential lookup failed before favoriting");
            FavoriteError::Failed(e)
        })?;

        let username = record.as_ref().and_then(|r| r.username.as_deref()).filter(|s| !s.is_empty());
        let api_key = record.as_ref().and_then(|r| r.api_key.as_deref()).filter(|s| !s.is_empty());
        let creds = match (username, api_key) {
            (Some(u), Some(k)) => Credentials::new(u, k),
            (u, k) => {
                return Err(FavoriteError::IncompleteCredentials {
                    missing_username: u.is_none(),
                    missing_key: k.is_none(),
                });
            }
        };

        match self.client.add_favorite(&creds, external_id).await {
            Ok(()) => {
                info!(user_id = user_id.0, post_id = external_id, "favorite added");
                Ok(FavoriteOutcome::Added)
            }
            Err(SauceError::ImageBoard { message, .. }) if message == ALREADY_FAVORITED => {
                info!(user_id = user_id.0, post_id = external_id, "post already favorited");
                Ok(FavoriteOutcome::AlreadyFavorited)
            }
            Err(e) => {
                error!(user_id = user_id.0, post_id = external_id, error = %e, "favorite failed");
                Err(FavoriteError::Failed(e))
            }
        }
    }
}
