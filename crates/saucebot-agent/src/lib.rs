// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot orchestrator for saucebot.
//!
//! [`BotAgent`] turns platform-neutral [`InboundEvent`]s into replies:
//! - photos run through download, search and reply (see [`pipeline`])
//! - commands manage the user's e621 login and a few extras (see [`commands`])
//! - favorite buttons call the e621 favorites API (see [`favorites`])
//!
//! Every inbound event is appended to the audit log in the background.

pub mod commands;
pub mod favorites;
pub mod images;
pub mod markdown;
pub mod pipeline;
pub mod replies;
pub mod session;

use std::sync::Arc;
use std::time::Duration;

use saucebot_config::model::SaucebotConfig;
use saucebot_config::FavoriteCallback;
use saucebot_core::events::record_in_background;
use saucebot_core::types::{ChatId, InboundEvent, LogEvent, MessageRef, OutboundMessage};
use saucebot_core::{
    ChatPlatform, CredentialRepository, CredentialStore, EventLog, SauceError, StorageAdapter,
};
use saucebot_e621::{CredentialValidator, E621Client, FavoritesClient};
use saucebot_fuzzysearch::{FuzzySearchClient, ImageSearch};
use tracing::info;

pub use favorites::FavoriteRequest;
pub use images::ImageDir;
pub use pipeline::PhotoOutcome;
pub use session::SessionMap;

/// Behavior knobs taken from `[bot]` and `[e621]`.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub max_distance: u32,
    pub admin_chat_id: Option<ChatId>,
    pub favorite_callback: FavoriteCallback,
    pub favorites_pages: u32,
}

impl BotSettings {
    pub fn from_config(config: &SaucebotConfig) -> Self {
        Self {
            max_distance: config.bot.max_distance,
            admin_chat_id: config.bot.admin_chat_id.map(ChatId),
            favorite_callback: config.bot.favorite_callback,
            favorites_pages: config.e621.favorites_pages,
        }
    }
}

/// The orchestrator. Shared behind an `Arc` by the platform dispatcher.
pub struct BotAgent {
    chat: Arc<dyn ChatPlatform>,
    events: Arc<dyn EventLog>,
    credentials: CredentialStore,
    validator: CredentialValidator,
    favorites: FavoritesClient,
    search: ImageSearch,
    e621: E621Client,
    sessions: SessionMap,
    images: ImageDir,
    settings: BotSettings,
}

impl BotAgent {
    /// Builds every collaborator from configuration.
    ///
    /// Fails when an HTTP client cannot be built or the FuzzySearch API key
    /// is missing.
    pub fn from_config(
        config: &SaucebotConfig,
        chat: Arc<dyn ChatPlatform>,
        storage: Arc<dyn StorageAdapter>,
    ) -> Result<Self, SauceError> {
        let repo: Arc<dyn CredentialRepository> = storage.clone();
        let events: Arc<dyn EventLog> = storage;
        let credentials = CredentialStore::new(repo);

        let e621 = E621Client::new(&config.e621)?;
        let validator = CredentialValidator::new(e621.clone(), credentials.clone());
        let favorites = FavoritesClient::new(e621.clone(), credentials.clone());
        let search = ImageSearch::new(
            FuzzySearchClient::new(&config.fuzzysearch)?,
            Arc::clone(&events),
            validator.clone(),
            e621.clone(),
            Duration::from_secs(config.e621.liveness_timeout_secs),
        );

        let settings = BotSettings::from_config(config);
        info!(
            max_distance = settings.max_distance,
            favorite_callback = ?settings.favorite_callback,
            photo_dir = config.bot.photo_dir.as_str(),
            "bot agent initialized"
        );

        Ok(Self {
            chat,
            events,
            credentials,
            validator,
            favorites,
            search,
            e621,
            sessions: SessionMap::new(
                Duration::from_secs(config.bot.session_ttl_secs),
                config.bot.session_capacity,
            ),
            images: ImageDir::new(&config.bot.photo_dir),
            settings,
        })
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn sessions(&self) -> &SessionMap {
        &self.sessions
    }

    pub fn images(&self) -> &ImageDir {
        &self.images
    }

    /// Handles one inbound event to completion.
    ///
    /// Only failures to talk to the chat platform are returned; everything
    /// else has already been turned into a reply.
    pub async fn handle(&self, event: InboundEvent) -> Result<(), SauceError> {
        if let Some(audit) = audit_event(&event) {
            record_in_background(Arc::clone(&self.events), audit);
        }

        match event {
            InboundEvent::Photo(photo) => self.handle_photo(&photo).await.map(|_| ()),
            InboundEvent::Command {
                chat_id,
                message_id,
                sender,
                command,
                replied_photo,
            } => {
                let ctx = commands::CommandContext {
                    chat_id,
                    message_id,
                    sender,
                    replied_photo,
                };
                self.handle_command(&ctx, command).await
            }
            InboundEvent::Callback {
                callback_id,
                sender,
                message,
                data,
            } => {
                self.handle_callback(&callback_id, &sender, message, &data)
                    .await
            }
        }
    }

    async fn say(
        &self,
        chat_id: ChatId,
        text: impl Into<String>,
    ) -> Result<MessageRef, SauceError> {
        self.chat.send(OutboundMessage::text(chat_id, text)).await
    }

    async fn say_markdown(
        &self,
        chat_id: ChatId,
        text: impl Into<String>,
    ) -> Result<MessageRef, SauceError> {
        self.chat
            .send(OutboundMessage::text(chat_id, text).markdown())
            .await
    }
}

fn audit_event(event: &InboundEvent) -> Option<LogEvent> {
    match event {
        InboundEvent::Photo(photo) => Some(LogEvent::PhotoReceived {
            chat_id: photo.chat_id,
            message_id: photo.message_id,
            user_id: photo.user_id,
        }),
        InboundEvent::Command {
            chat_id,
            sender,
            command,
            ..
        } => Some(LogEvent::CommandReceived {
            chat_id: *chat_id,
            user_id: sender.id,
            command: command.name().to_string(),
        }),
        InboundEvent::Callback { sender, data, .. } => {
            FavoriteRequest::parse(data).map(|request| LogEvent::FavoriteRequested {
                user_id: sender.id,
                external_id: request.post_id,
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use saucebot_core::types::{BotCommand, MessageId, PhotoMessage, Sender, UserId};

    fn sender() -> Sender {
        Sender {
            id: UserId(7),
            first_name: "Rex".into(),
            username: None,
        }
    }

    #[test]
    fn photos_and_commands_are_audited() {
        let photo = InboundEvent::Photo(PhotoMessage {
            chat_id: ChatId(1),
            message_id: MessageId(2),
            user_id: None,
            file_id: "f".into(),
        });
        assert_eq!(audit_event(&photo).unwrap().kind(), "photo_received");

        let command = InboundEvent::Command {
            chat_id: ChatId(1),
            message_id: MessageId(3),
            sender: sender(),
            command: BotCommand::DisplayInfo,
            replied_photo: None,
        };
        match audit_event(&command) {
            Some(LogEvent::CommandReceived { command, user_id, .. }) => {
                assert_eq!(command, "displaye621information");
                assert_eq!(user_id, UserId(7));
            }
            other => panic!("unexpected audit event: {other:?}"),
        }
    }

    #[test]
    fn only_favorite_callbacks_are_audited() {
        let callback = |data: &str| InboundEvent::Callback {
            callback_id: "cb".into(),
            sender: sender(),
            message: None,
            data: data.into(),
        };
        assert_eq!(
            audit_event(&callback("addToFavorites:42")),
            Some(LogEvent::FavoriteRequested {
                user_id: UserId(7),
                external_id: Some("42".into()),
            })
        );
        assert!(audit_event(&callback("favAdded")).is_none());
    }

    #[test]
    fn settings_follow_config() {
        let mut config = SaucebotConfig::default();
        config.bot.admin_chat_id = Some(-100);
        config.bot.favorite_callback = FavoriteCallback::Session;
        let settings = BotSettings::from_config(&config);
        assert_eq!(settings.max_distance, 2);
        assert_eq!(settings.admin_chat_id, Some(ChatId(-100)));
        assert_eq!(settings.favorite_callback, FavoriteCallback::Session);
    }
}
