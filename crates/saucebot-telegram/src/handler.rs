// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update routing and conversion.
//!
//! Turns incoming Telegram messages and callback queries into
//! platform-agnostic [`InboundEvent`]s. Only commands, photos and button
//! presses are of interest; everything else converts to `None`.

use saucebot_core::types::{
    BotCommand, ChatId, InboundEvent, MessageId, MessageRef, PhotoMessage, Sender, UserId,
};
use teloxide::prelude::*;
use teloxide::types::User;
use tracing::debug;

use crate::media;

/// Commands advertised in the client's command menu.
pub const COMMAND_MENU: &[(&str, &str)] = &[
    ("start", "How to use the bot"),
    ("sete621username", "Link your e621 username"),
    ("sete621key", "Link your e621 API key"),
    ("displaye621information", "Show the linked e621 account"),
    ("deletee621info", "Forget the linked e621 account"),
    ("analyzee621favs", "Most common tags in your favorites"),
    ("getPost", "Look up an e621 post by id"),
    ("submiterror", "Report a problem"),
    ("retry", "Search a replied photo again"),
];

/// Parses a `/command args` text.
///
/// A `@mention` suffix on the command must name `bot_username` when that is
/// known; commands addressed to other bots yield `None`. Names are matched
/// case-sensitively.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<BotCommand> {
    let text = text.strip_prefix('/')?;
    let (head, args) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim().to_string()),
        None => (text, String::new()),
    };
    let name = match head.split_once('@') {
        Some((name, mention)) => {
            if let Some(me) = bot_username
                && !mention.eq_ignore_ascii_case(me)
            {
                return None;
            }
            name
        }
        None => head,
    };

    let command = match name {
        "start" => BotCommand::Start,
        "sete621username" => BotCommand::SetUsername(args),
        "sete621key" => BotCommand::SetApiKey(args),
        "deletee621info" => BotCommand::DeleteInfo,
        "displaye621information" => BotCommand::DisplayInfo,
        "analyzee621favs" => BotCommand::AnalyzeFavorites(args),
        "getPost" => BotCommand::GetPost(args),
        "submiterror" => BotCommand::SubmitError(args),
        "retry" => BotCommand::Retry,
        _ => return None,
    };
    Some(command)
}

/// Converts a Telegram user into a [`Sender`].
pub fn to_sender(user: &User) -> Sender {
    Sender {
        id: UserId(user.id.0 as i64),
        first_name: user.first_name.clone(),
        username: user.username.clone(),
    }
}

/// The photo carried by `msg`, reduced to its largest size.
pub fn photo_message(msg: &Message) -> Option<PhotoMessage> {
    let largest = media::largest_photo(msg.photo()?)?;
    Some(PhotoMessage {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
        user_id: msg.from.as_ref().map(|u| UserId(u.id.0 as i64)),
        file_id: largest.file.id.0.clone(),
    })
}

/// Converts a message into an event.
///
/// Commands need a known sender. Photos are forwarded even without one.
pub fn message_to_event(msg: &Message, bot_username: Option<&str>) -> Option<InboundEvent> {
    if let Some(text) = msg.text()
        && let Some(command) = parse_command(text, bot_username)
    {
        let Some(from) = msg.from.as_ref() else {
            debug!(chat_id = msg.chat.id.0, "ignoring command without sender");
            return None;
        };
        return Some(InboundEvent::Command {
            chat_id: ChatId(msg.chat.id.0),
            message_id: MessageId(msg.id.0),
            sender: to_sender(from),
            replied_photo: msg.reply_to_message().and_then(photo_message),
            command,
        });
    }

    photo_message(msg).map(InboundEvent::Photo)
}

/// Converts a button press into an event. Presses without data are dropped.
pub fn callback_to_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.clone()?;
    let message = query.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat().id.0),
        message_id: MessageId(m.id().0),
    });
    Some(InboundEvent::Callback {
        callback_id: query.id.to_string(),
        sender: to_sender(&query.from),
        message,
        data,
    })
}
