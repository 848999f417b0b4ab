// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash-command handlers.

use std::sync::Arc;

use saucebot_core::events::report_in_background;
use saucebot_core::types::{
    BotCommand, ChatId, CredentialPatch, ErrorReport, MessageId, OutboundMessage, PhotoMessage,
    Sender, ValidationResult,
};
use saucebot_core::{SauceError, ValidationErrorKind};
use saucebot_e621::analysis::analyze_favorites;
use tracing::{error, info, warn};

use crate::replies;
use crate::BotAgent;

/// Where a command came from.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub sender: Sender,
    /// The photo the command replied to, if any.
    pub replied_photo: Option<PhotoMessage>,
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Username,
    ApiKey,
}

/// Parsed arguments of `/analyzee621favs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeArgs {
    pub count: usize,
    pub exclude: Vec<String>,
}

impl AnalyzeArgs {
    /// `[count] [tag...]`. The count is rounded and clamped; `None` if it is not a number.
    pub fn parse(args: &str) -> Option<Self> {
        let mut words = args.split_whitespace();
        let count = match words.next() {
            None => replies::DEFAULT_TOP_COUNT,
            Some(raw) => {
                let value: f64 = raw.parse().ok()?;
                if value.is_nan() {
                    return None;
                }
                value.round().clamp(1.0, replies::MAX_TOP_COUNT as f64) as usize
            }
        };
        Some(Self {
            count,
            exclude: words.map(str::to_string).collect(),
        })
    }
}

impl BotAgent {
    pub async fn handle_command(
        &self,
        ctx: &CommandContext,
        command: BotCommand,
    ) -> Result<(), SauceError> {
        info!(
            chat_id = ctx.chat_id.0,
            user_id = ctx.sender.id.0,
            command = command.name(),
            "command received"
        );
        match command {
            BotCommand::Start => self.say(ctx.chat_id, replies::WELCOME).await.map(|_| ()),
            BotCommand::SetUsername(arg) => self.set_field(ctx, Field::Username, &arg).await,
            BotCommand::SetApiKey(arg) => self.set_field(ctx, Field::ApiKey, &arg).await,
            BotCommand::DeleteInfo => self.delete_info(ctx).await,
            BotCommand::DisplayInfo => self.display_info(ctx).await,
            BotCommand::AnalyzeFavorites(args) => self.analyze(ctx, &args).await,
            BotCommand::GetPost(arg) => self.get_post(ctx, &arg).await,
            BotCommand::SubmitError(text) => self.submit_error(ctx, &text).await,
            BotCommand::Retry => self.retry(ctx).await,
        }
    }

    async fn set_field(&self, ctx: &CommandContext, field: Field, arg: &str) -> Result<(), SauceError> {
        let Some(value) = arg.split_whitespace().next() else {
            let usage = match field {
                Field::Username => replies::USERNAME_USAGE,
                Field::ApiKey => replies::KEY_USAGE,
            };
            return self.say(ctx.chat_id, usage).await.map(|_| ());
        };

        let user_id = ctx.sender.id;
        let patch = match field {
            Field::Username => CredentialPatch::username(value),
            Field::ApiKey => CredentialPatch::api_key(value),
        };
        self.credentials.upsert(user_id, patch).await;

        let record = match self.credentials.get(user_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(user_id = user_id.0, "credential record missing right after write");
                return self.reply_validation_error(ctx, ValidationErrorKind::Unknown).await;
            }
            Err(e) => {
                error!(user_id = user_id.0, error = %e, "credential lookup failed");
                return self.reply_validation_error(ctx, ValidationErrorKind::Unknown).await;
            }
        };

        let other_missing = match field {
            Field::Username => record.api_key.as_deref().is_none_or(str::is_empty),
            Field::ApiKey => record.username.as_deref().is_none_or(str::is_empty),
        };
        if other_missing {
            let text = match field {
                Field::Username => replies::USERNAME_UNVERIFIED,
                Field::ApiKey => replies::KEY_UNVERIFIED,
            };
            return self.say(ctx.chat_id, text).await.map(|_| ());
        }

        let result = self
            .validator
            .validate(record.username.as_deref(), record.api_key.as_deref())
            .await;
        match result {
            ValidationResult::Valid(_) => {
                let text = match field {
                    Field::Username => replies::USERNAME_VALIDATED,
                    Field::ApiKey => replies::KEY_VALIDATED,
                };
                self.say(ctx.chat_id, text).await.map(|_| ())
            }
            ValidationResult::Invalid(kind) => self.reply_validation_error(ctx, kind).await,
        }
    }

    async fn delete_info(&self, ctx: &CommandContext) -> Result<(), SauceError> {
        match self.credentials.delete(ctx.sender.id).await {
            Ok(()) => self.say(ctx.chat_id, replies::DELETED).await.map(|_| ()),
            Err(e) => {
                error!(user_id = ctx.sender.id.0, error = %e, "credential delete failed");
                self.reply_validation_error(ctx, ValidationErrorKind::Unknown).await
            }
        }
    }

    async fn display_info(&self, ctx: &CommandContext) -> Result<(), SauceError> {
        let record = match self.credentials.get(ctx.sender.id).await {
            Ok(Some(record)) => record,
            Ok(None) => return self.say(ctx.chat_id, replies::NO_INFO).await.map(|_| ()),
            Err(e) => {
                error!(user_id = ctx.sender.id.0, error = %e, "credential lookup failed");
                return self.reply_validation_error(ctx, ValidationErrorKind::Unknown).await;
            }
        };

        let username = record.username.as_deref().filter(|u| !u.is_empty());
        let key_set = record.api_key.as_deref().is_some_and(|k| !k.is_empty());
        let valid = self
            .validator
            .validate(username, record.api_key.as_deref())
            .await
            .is_valid();
        self.say_markdown(ctx.chat_id, replies::display_info(username, key_set, valid))
            .await
            .map(|_| ())
    }

    async fn analyze(&self, ctx: &CommandContext, args: &str) -> Result<(), SauceError> {
        let Some(args) = AnalyzeArgs::parse(args) else {
            return self
                .say_markdown(ctx.chat_id, replies::ANALYZE_SYNTAX)
                .await
                .map(|_| ());
        };

        let creds = match self.validator.validate_for_user(Some(ctx.sender.id)).await {
            ValidationResult::Valid(creds) => creds,
            ValidationResult::Invalid(kind) => return self.reply_validation_error(ctx, kind).await,
        };

        let ranked = analyze_favorites(
            &self.e621,
            &creds,
            self.settings.favorites_pages,
            &args.exclude,
            args.count,
        )
        .await;
        match ranked {
            Ok(tags) if tags.is_empty() => {
                self.say(ctx.chat_id, replies::NO_FAVORITES).await.map(|_| ())
            }
            Ok(tags) => self
                .say_markdown(ctx.chat_id, replies::analysis(args.count, &tags))
                .await
                .map(|_| ()),
            Err(e) => {
                error!(user_id = ctx.sender.id.0, error = %e, "favorites analysis failed");
                self.say(ctx.chat_id, replies::ANALYZE_FAILED).await.map(|_| ())
            }
        }
    }

    async fn get_post(&self, ctx: &CommandContext, arg: &str) -> Result<(), SauceError> {
        let post_id = arg.trim();
        if post_id.is_empty() || !post_id.bytes().all(|b| b.is_ascii_digit()) {
            return self.say(ctx.chat_id, replies::GET_POST_USAGE).await.map(|_| ());
        }

        let creds = match self.credentials.get(ctx.sender.id).await {
            Ok(record) => record.and_then(|r| r.credentials()),
            Err(e) => {
                error!(user_id = ctx.sender.id.0, error = %e, "credential lookup failed");
                return self.reply_validation_error(ctx, ValidationErrorKind::Unknown).await;
            }
        };
        let Some(creds) = creds else {
            return self
                .reply_validation_error(ctx, ValidationErrorKind::IncompleteInfo)
                .await;
        };

        match self.e621.get_post(&creds, post_id).await {
            Ok(post) => {
                let link = self.e621.post_link(post_id);
                self.say(ctx.chat_id, replies::post_summary(&link, &post))
                    .await
                    .map(|_| ())
            }
            Err(e) => {
                warn!(post_id, error = %e, "post lookup failed");
                self.say(ctx.chat_id, replies::GET_POST_FAILED).await.map(|_| ())
            }
        }
    }

    async fn submit_error(&self, ctx: &CommandContext, text: &str) -> Result<(), SauceError> {
        let description = text.trim();
        if description.is_empty() {
            return self.say(ctx.chat_id, replies::SUBMIT_USAGE).await.map(|_| ());
        }

        let report = ErrorReport {
            reporter_id: ctx.sender.id,
            reporter_name: ctx.sender.first_name.clone(),
            reporter_username: ctx.sender.username.clone(),
            description: description.to_string(),
        };
        report_in_background(Arc::clone(&self.events), report);

        if let Some(admin) = self.settings.admin_chat_id {
            let notice = replies::admin_notice(
                &ctx.sender.first_name,
                ctx.sender.username.as_deref(),
                description,
            );
            if let Err(e) = self.chat.send(OutboundMessage::text(admin, notice)).await {
                warn!(admin_chat = admin.0, error = %e, "failed to forward error report");
            }
        }
        self.say(ctx.chat_id, replies::ERROR_SUBMITTED).await.map(|_| ())
    }

    async fn retry(&self, ctx: &CommandContext) -> Result<(), SauceError> {
        let Some(original) = &ctx.replied_photo else {
            return self.say(ctx.chat_id, replies::RETRY_USAGE).await.map(|_| ());
        };
        let photo = PhotoMessage {
            user_id: Some(ctx.sender.id),
            ..original.clone()
        };
        self.handle_photo(&photo).await.map(|_| ())
    }

    async fn reply_validation_error(
        &self,
        ctx: &CommandContext,
        kind: ValidationErrorKind,
    ) -> Result<(), SauceError> {
        self.say(ctx.chat_id, replies::validation_error(kind))
            .await
            .map(|_| ())
    }
}
