// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! "Add to e621 favorites" button presses.

use saucebot_core::types::{FavoriteOutcome, MessageRef, Sender};
use saucebot_core::{FavoriteError, SauceError};
use tracing::{debug, warn};

use crate::replies;
use crate::BotAgent;

/// A parsed favorite callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteRequest {
    /// `None` for a bare payload, resolved from the chat's search session.
    pub post_id: Option<String>,
}

impl FavoriteRequest {
    /// Accepts `addToFavorites:<id>` and bare `addToFavorites`.
    pub fn parse(data: &str) -> Option<Self> {
        let rest = data.strip_prefix(replies::FAVORITE_ACTION)?;
        if rest.is_empty() {
            return Some(Self { post_id: None });
        }
        let id = rest.strip_prefix(':')?;
        Some(Self {
            post_id: (!id.is_empty()).then(|| id.to_string()),
        })
    }
}

impl BotAgent {
    /// Acknowledges the press, then runs the favorite flow for favorite payloads.
    ///
    /// Any other payload (including the final "done" buttons) is only acknowledged.
    pub async fn handle_callback(
        &self,
        callback_id: &str,
        sender: &Sender,
        message: Option<MessageRef>,
        data: &str,
    ) -> Result<(), SauceError> {
        if let Err(e) = self.chat.answer_callback(callback_id).await {
            warn!(callback_id, error = %e, "failed to answer callback");
        }

        let Some(request) = FavoriteRequest::parse(data) else {
            debug!(data, "ignoring callback");
            return Ok(());
        };
        let Some(target) = message else {
            warn!(user_id = sender.id.0, "favorite button without a message");
            return Ok(());
        };

        self.chat
            .edit_keyboard(target, Some(replies::processing_keyboard()))
            .await?;

        let post_id = match request.post_id {
            Some(id) => id,
            None => match self.sessions.get(target.chat_id) {
                Some(top) => top.external_id,
                None => {
                    debug!(chat_id = target.chat_id.0, "no live search session");
                    return self.finish(target, replies::EXPIRED_LABEL).await;
                }
            },
        };

        match self.favorites.add_favorite(sender.id, &post_id).await {
            Ok(FavoriteOutcome::Added) => self.finish(target, replies::ADDED_LABEL).await,
            Ok(FavoriteOutcome::AlreadyFavorited) => {
                self.finish(target, replies::ALREADY_LABEL).await
            }
            Err(FavoriteError::IncompleteCredentials {
                missing_username,
                missing_key,
            }) => {
                self.finish(target, replies::INCOMPLETE_LABEL).await?;
                self.say(
                    target.chat_id,
                    replies::incomplete_instructions(missing_username, missing_key),
                )
                .await
                .map(|_| ())
            }
            Err(FavoriteError::Failed(_)) => self.finish(target, replies::FAILED_LABEL).await,
        }
    }

    async fn finish(&self, target: MessageRef, label: &str) -> Result<(), SauceError> {
        self.chat
            .edit_keyboard(target, Some(replies::outcome_keyboard(label)))
            .await
    }
}
