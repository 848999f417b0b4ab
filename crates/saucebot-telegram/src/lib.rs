// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram adapter for saucebot.
//!
//! [`TelegramPlatform`] implements [`ChatPlatform`] on the Bot API via
//! teloxide. [`dispatch::run`] long-polls for updates and feeds them to a
//! [`BotAgent`](saucebot_agent::BotAgent).

pub mod dispatch;
pub mod handler;
pub mod media;

use async_trait::async_trait;
use saucebot_config::model::TelegramConfig;
use saucebot_core::types::{Keyboard, MessageRef, OutboundMessage, TextFormat};
use saucebot_core::{ChatPlatform, SauceError};
use teloxide::prelude::*;
use teloxide::{ApiError, RequestError};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, ReplyParameters};
use tracing::{debug, warn};

pub use dispatch::run;

/// Telegram implementation of [`ChatPlatform`].
#[derive(Clone)]
pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    /// Creates the adapter.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig) -> Result<Self, SauceError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            SauceError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(SauceError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        Ok(Self {
            bot: Bot::new(token),
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.data.clone()))
            .collect::<Vec<_>>()
    }))
}

/// Telegram refused the MarkdownV2 entities of a message.
fn is_markdown_rejection(e: &RequestError) -> bool {
    matches!(e, RequestError::Api(ApiError::CantParseEntities(_)))
}

fn is_unchanged_markup(e: &RequestError) -> bool {
    matches!(e, RequestError::Api(ApiError::MessageNotModified))
}

fn channel_error(what: &str, e: RequestError) -> SauceError {
    SauceError::Channel {
        message: format!("failed to {what}: {e}"),
        source: Some(Box::new(e)),
    }
}

impl TelegramPlatform {
    async fn send_once(
        &self,
        msg: &OutboundMessage,
        format: TextFormat,
    ) -> Result<Message, RequestError> {
        let mut request = self
            .bot
            .send_message(teloxide::types::ChatId(msg.chat_id.0), msg.text.clone());
        if format == TextFormat::MarkdownV2 {
            request = request.parse_mode(ParseMode::MarkdownV2);
        }
        if let Some(reply_to) = msg.reply_to {
            request =
                request.reply_parameters(ReplyParameters::new(teloxide::types::MessageId(reply_to.0)));
        }
        if let Some(keyboard) = &msg.keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        request.await
    }
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageRef, SauceError> {
        let sent = match self.send_once(&msg, msg.format).await {
            Ok(sent) => sent,
            Err(e) if msg.format == TextFormat::MarkdownV2 && is_markdown_rejection(&e) => {
                warn!(error = %e, "MarkdownV2 failed, sending as plain text");
                self.send_once(&msg, TextFormat::Plain)
                    .await
                    .map_err(|e| channel_error("send message", e))?
            }
            Err(e) => return Err(channel_error("send message", e)),
        };

        Ok(MessageRef {
            chat_id: saucebot_core::types::ChatId(sent.chat.id.0),
            message_id: saucebot_core::types::MessageId(sent.id.0),
        })
    }

    async fn edit_keyboard(
        &self,
        target: MessageRef,
        keyboard: Option<Keyboard>,
    ) -> Result<(), SauceError> {
        let mut request = self.bot.edit_message_reply_markup(
            teloxide::types::ChatId(target.chat_id.0),
            teloxide::types::MessageId(target.message_id.0),
        );
        if let Some(keyboard) = &keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }

        match request.await {
            Ok(_) => Ok(()),
            Err(e) if is_unchanged_markup(&e) => {
                debug!(message_id = target.message_id.0, "keyboard unchanged");
                Ok(())
            }
            Err(e) => Err(channel_error("edit keyboard", e)),
        }
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, SauceError> {
        media::download_file(&self.bot, file_id).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), SauceError> {
        self.bot
            .answer_callback_query(teloxide::types::CallbackQueryId(callback_id.to_string()))
            .await
            .map_err(|e| channel_error("answer callback query", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use saucebot_core::types::Button;

    use super::*;

    #[test]
    fn new_requires_bot_token() {
        let config = TelegramConfig { bot_token: None };
        assert!(TelegramPlatform::new(&config).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        let config = TelegramConfig {
            bot_token: Some(String::new()),
        };
        assert!(TelegramPlatform::new(&config).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let config = TelegramConfig {
            bot_token: Some("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11".into()),
        };
        assert!(TelegramPlatform::new(&config).is_ok());
    }

    #[test]
    fn entity_parse_error_triggers_plain_fallback() {
        let rejected = RequestError::Api(ApiError::CantParseEntities(
            "Bad Request: can't parse entities: Character '.' is reserved".into(),
        ));
        assert!(is_markdown_rejection(&rejected));
        assert!(!is_markdown_rejection(&RequestError::Api(ApiError::BotBlocked)));
        assert!(!is_markdown_rejection(&RequestError::Api(ApiError::Unknown(
            "can't parse entities".into()
        ))));
    }

    #[test]
    fn unchanged_markup_is_recognized() {
        assert!(is_unchanged_markup(&RequestError::Api(ApiError::MessageNotModified)));
        assert!(!is_unchanged_markup(&RequestError::Api(ApiError::MessageToEditNotFound)));
    }

    #[test]
    fn keyboard_maps_to_callback_buttons() {
        let keyboard = Keyboard {
            rows: vec![
                vec![Button {
                    label: "Add".into(),
                    data: "addToFavorites:5".into(),
                }],
                vec![
                    Button {
                        label: "a".into(),
                        data: "x".into(),
                    },
                    Button {
                        label: "b".into(),
                        data: "y".into(),
                    },
                ],
            ],
        };
        let markup = to_markup(&keyboard);
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[1].len(), 2);
        assert_eq!(markup.inline_keyboard[0][0].text, "Add");
        assert_eq!(
            markup.inline_keyboard[0][0],
            InlineKeyboardButton::callback("Add", "addToFavorites:5")
        );
    }
}
