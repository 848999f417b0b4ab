// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across saucebot crates.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::Display;

use crate::error::ValidationErrorKind;

/// Chat-platform identifier of a chat (private chat, group, channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

/// Chat-platform identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Identifier of a message, unique within its chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i32);

/// Fully qualified reference to a sent or received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

// --- Credentials ---

/// One chat user's stored link to an image-board account.
///
/// Either field may be missing; a record with a single field is a valid,
/// partially configured state.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub user_id: UserId,
    pub username: Option<String>,
    pub api_key: Option<String>,
}

impl UserCredential {
    /// True when both fields are present.
    pub fn is_complete(&self) -> bool {
        self.username.is_some() && self.api_key.is_some()
    }

    /// The complete credential pair, if both fields are present.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.api_key) {
            (Some(username), Some(api_key)) => Some(Credentials {
                username: username.clone(),
                api_key: api_key.clone(),
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for UserCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredential")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A partial update to a [`UserCredential`]. Only `Some` fields are written.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialPatch {
    pub username: Option<String>,
    pub api_key: Option<String>,
}

impl CredentialPatch {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            api_key: None,
        }
    }

    pub fn api_key(api_key: impl Into<String>) -> Self {
        Self {
            username: None,
            api_key: Some(api_key.into()),
        }
    }

    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.api_key.is_none()
    }
}

impl fmt::Debug for CredentialPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPatch")
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A complete username/API-key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// How far along a user is in linking their image-board account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    /// No record exists.
    Absent,
    /// A record exists with only one of the two fields.
    Partial,
    /// Both fields are stored.
    Complete,
}

impl CredentialState {
    pub fn of(record: Option<&UserCredential>) -> Self {
        match record {
            None => CredentialState::Absent,
            Some(r) if r.is_complete() => CredentialState::Complete,
            Some(_) => CredentialState::Partial,
        }
    }
}

/// Outcome of checking credentials against the image board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The image board accepted the credentials, echoed back here.
    Valid(Credentials),
    /// The credentials could not be confirmed.
    Invalid(ValidationErrorKind),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn error_kind(&self) -> Option<ValidationErrorKind> {
        match self {
            ValidationResult::Valid(_) => None,
            ValidationResult::Invalid(kind) => Some(*kind),
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            ValidationResult::Valid(c) => Some(c),
            ValidationResult::Invalid(_) => None,
        }
    }
}

/// Successful result of a favoriting attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteOutcome {
    Added,
    /// The post was already in the user's favorites.
    AlreadyFavorited,
}

// --- Search results ---

/// Source sites known to the reverse-image-search API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
pub enum Site {
    FurAffinity,
    Weasyl,
    Twitter,
    #[serde(rename = "e621")]
    #[strum(serialize = "e621")]
    E621,
    #[serde(other)]
    Unknown,
}

/// Provenance details attached to some matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

/// One candidate returned by the reverse-image-search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub site: Site,
    #[serde(rename = "site_id_str")]
    pub external_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i64>,
    /// Perceptual-hash distance; lower is closer. Only comparable within one search.
    #[serde(default)]
    pub distance: Option<u64>,
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artists: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_info: Option<SiteInfo>,
}

impl SearchMatch {
    /// Ordering key: missing distances sort after every scored match.
    pub fn distance_key(&self) -> u64 {
        self.distance.unwrap_or(u64::MAX)
    }

    /// Minimal match, mostly useful for tests and fixtures.
    pub fn new(site: Site, external_id: impl Into<String>, distance: Option<u64>) -> Self {
        let external_id = external_id.into();
        Self {
            site,
            url: String::new(),
            external_id,
            site_id: None,
            distance,
            tags: Vec::new(),
            filename: None,
            artists: None,
            rating: None,
            posted_at: None,
            hash: None,
            sha256: None,
            site_info: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Outbound chat messages ---

/// How the chat platform should interpret message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    MarkdownV2,
}

/// One inline button with its callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

/// Inline keyboard attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// A keyboard with one button.
    pub fn single(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            rows: vec![vec![Button {
                label: label.into(),
                data: data.into(),
            }]],
        }
    }

    /// Labels of every button, row by row.
    pub fn labels(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .map(|b| b.label.as_str())
            .collect()
    }
}

/// A message to be delivered through the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub format: TextFormat,
    pub reply_to: Option<MessageId>,
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            format: TextFormat::Plain,
            reply_to: None,
            keyboard: None,
        }
    }

    pub fn reply_to(mut self, message_id: MessageId) -> Self {
        self.reply_to = Some(message_id);
        self
    }

    pub fn markdown(mut self) -> Self {
        self.format = TextFormat::MarkdownV2;
        self
    }

    pub fn keyboard(mut self, keyboard: Option<Keyboard>) -> Self {
        self.keyboard = keyboard;
        self
    }
}

// --- Inbound chat events ---

/// The user behind an inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: UserId,
    pub first_name: String,
    pub username: Option<String>,
}

/// A photo message, reduced to what the search pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    /// `None` for anonymous posts (channels, anonymous group admins).
    pub user_id: Option<UserId>,
    /// Platform file identifier of the largest photo size.
    pub file_id: String,
}

/// Bot commands understood by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    SetUsername(String),
    SetApiKey(String),
    DeleteInfo,
    DisplayInfo,
    /// Raw arguments: `[count] [tag...]`.
    AnalyzeFavorites(String),
    GetPost(String),
    SubmitError(String),
    Retry,
}

impl BotCommand {
    /// Command name as typed by users, without the leading slash.
    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::SetUsername(_) => "sete621username",
            BotCommand::SetApiKey(_) => "sete621key",
            BotCommand::DeleteInfo => "deletee621info",
            BotCommand::DisplayInfo => "displaye621information",
            BotCommand::AnalyzeFavorites(_) => "analyzee621favs",
            BotCommand::GetPost(_) => "getPost",
            BotCommand::SubmitError(_) => "submiterror",
            BotCommand::Retry => "retry",
        }
    }
}

/// An event delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Photo(PhotoMessage),
    Command {
        chat_id: ChatId,
        message_id: MessageId,
        sender: Sender,
        command: BotCommand,
        /// The photo this command replied to, if any.
        replied_photo: Option<PhotoMessage>,
    },
    Callback {
        callback_id: String,
        sender: Sender,
        /// The message carrying the pressed button.
        message: Option<MessageRef>,
        data: String,
    },
}

// --- Audit records ---

/// Append-only audit records written to the event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEvent {
    PhotoReceived {
        chat_id: ChatId,
        message_id: MessageId,
        user_id: Option<UserId>,
    },
    CommandReceived {
        chat_id: ChatId,
        user_id: UserId,
        command: String,
    },
    FavoriteRequested {
        user_id: UserId,
        external_id: Option<String>,
    },
    Search {
        user_id: Option<UserId>,
        results: Vec<SearchMatch>,
    },
}

impl LogEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            LogEvent::PhotoReceived { .. } => "photo_received",
            LogEvent::CommandReceived { .. } => "command_received",
            LogEvent::FavoriteRequested { .. } => "favorite_requested",
            LogEvent::Search { .. } => "search",
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            LogEvent::PhotoReceived { user_id, .. } | LogEvent::Search { user_id, .. } => *user_id,
            LogEvent::CommandReceived { user_id, .. }
            | LogEvent::FavoriteRequested { user_id, .. } => Some(*user_id),
        }
    }
}

/// A problem report submitted by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub reporter_id: UserId,
    pub reporter_name: String,
    pub reporter_username: Option<String>,
    pub description: String,
}
