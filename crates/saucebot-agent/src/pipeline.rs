// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Photo pipeline: `Received -> Downloaded -> Searched -> NoMatch | MatchFound`.
//!
//! `DownloadFailed` and `SearchFailed` are terminal too. Whatever the end
//! state, the temporary image is removed before returning.

use std::path::Path;

use saucebot_config::FavoriteCallback;
use saucebot_core::SauceError;
use saucebot_core::types::{OutboundMessage, PhotoMessage, Site};
use tracing::{debug, error, info, warn};

use crate::replies;
use crate::BotAgent;

/// Sites a photo search may return.
const PHOTO_SEARCH_SITES: &[Site] = &[Site::E621];

/// Terminal state of one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoOutcome {
    DownloadFailed,
    SearchFailed,
    NoMatch,
    MatchFound {
        external_id: String,
        favorite_button: bool,
    },
}

impl BotAgent {
    /// Runs the pipeline for `photo` and replies to it.
    ///
    /// Pipeline failures become replies; only a failed reply is an error.
    pub async fn handle_photo(&self, photo: &PhotoMessage) -> Result<PhotoOutcome, SauceError> {
        let path = self.images.path_for(photo.chat_id, photo.message_id);
        let result = self.run_pipeline(photo, &path).await;
        self.images.remove(&path).await;

        let outcome = result?;
        info!(
            chat_id = photo.chat_id.0,
            message_id = photo.message_id.0,
            outcome = ?outcome,
            "photo handled"
        );
        Ok(outcome)
    }

    async fn run_pipeline(
        &self,
        photo: &PhotoMessage,
        path: &Path,
    ) -> Result<PhotoOutcome, SauceError> {
        if let Err(e) = self.download(photo, path).await {
            warn!(file_id = photo.file_id.as_str(), error = %e, "photo download failed");
            self.reply_to_photo(photo, replies::DOWNLOAD_FAILED).await?;
            return Ok(PhotoOutcome::DownloadFailed);
        }

        let found = match self
            .search
            .search(
                self.settings.max_distance,
                path,
                PHOTO_SEARCH_SITES,
                photo.user_id,
            )
            .await
        {
            Ok(found) => found,
            Err(e) => {
                error!(chat_id = photo.chat_id.0, error = %e, "image search failed");
                self.reply_to_photo(photo, replies::SEARCH_FAILED).await?;
                return Ok(PhotoOutcome::SearchFailed);
            }
        };
        debug!(liveness = ?found.liveness, matches = found.results.len(), "search results");

        let Some(top) = found.results.into_iter().next() else {
            self.reply_to_photo(photo, replies::NO_MATCH).await?;
            return Ok(PhotoOutcome::NoMatch);
        };

        let favorite_button = match photo.user_id {
            Some(user_id) => self.credentials.is_complete(user_id).await,
            None => false,
        };
        let keyboard =
            favorite_button.then(|| replies::favorite_keyboard(self.favorite_data(&top.external_id)));
        let link = self.e621.post_link(&top.external_id);
        let external_id = top.external_id.clone();
        self.sessions.remember(photo.chat_id, top);

        self.chat
            .send(
                OutboundMessage::text(photo.chat_id, replies::found(&link))
                    .reply_to(photo.message_id)
                    .keyboard(keyboard),
            )
            .await?;

        Ok(PhotoOutcome::MatchFound {
            external_id,
            favorite_button,
        })
    }

    async fn download(&self, photo: &PhotoMessage, path: &Path) -> Result<(), SauceError> {
        let bytes = self.chat.download_file(&photo.file_id).await?;
        self.images.write(path, &bytes).await
    }

    async fn reply_to_photo(&self, photo: &PhotoMessage, text: &str) -> Result<(), SauceError> {
        self.chat
            .send(OutboundMessage::text(photo.chat_id, text).reply_to(photo.message_id))
            .await
            .map(|_| ())
    }

    /// Callback payload of the favorite button for `external_id`.
    pub(crate) fn favorite_data(&self, external_id: &str) -> String {
        match self.settings.favorite_callback {
            FavoriteCallback::PostId => format!("{}:{external_id}", replies::FAVORITE_ACTION),
            FavoriteCallback::Session => replies::FAVORITE_ACTION.to_string(),
        }
    }
}
