// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-polling dispatcher.

use std::sync::Arc;

use saucebot_agent::BotAgent;
use saucebot_core::SauceError;
use saucebot_core::types::InboundEvent;
use teloxide::prelude::*;
use tracing::{debug, error, info, warn};

use crate::handler;

/// The bot's own username, for filtering `/cmd@otherbot` mentions.
#[derive(Clone, Debug, Default)]
struct BotIdentity {
    username: Option<String>,
}

/// Polls Telegram until Ctrl-C and hands every update to `agent`.
///
/// Updates from one chat are processed in order; different chats run
/// concurrently.
pub async fn run(bot: Bot, agent: Arc<BotAgent>) -> Result<(), SauceError> {
    let me = bot.get_me().await.map_err(|e| SauceError::Channel {
        message: format!("Telegram bot unreachable: {e}"),
        source: Some(Box::new(e)),
    })?;
    let identity = BotIdentity {
        username: me.user.username.clone(),
    };

    register_commands(&bot).await;

    info!(username = ?identity.username, "starting Telegram long polling");

    let tree = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback_query));

    Dispatcher::builder(bot, tree)
        .dependencies(dptree::deps![agent, identity])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Telegram long polling stopped");
    Ok(())
}

async fn register_commands(bot: &Bot) {
    let commands = handler::COMMAND_MENU
        .iter()
        .map(|(name, description)| teloxide::types::BotCommand::new(*name, *description))
        .collect::<Vec<_>>();
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!(error = %e, "failed to register command menu");
    }
}

async fn on_message(msg: Message, agent: Arc<BotAgent>, identity: BotIdentity) -> ResponseResult<()> {
    match handler::message_to_event(&msg, identity.username.as_deref()) {
        Some(event) => deliver(&agent, event).await,
        None => debug!(msg_id = msg.id.0, "ignoring unsupported message"),
    }
    respond(())
}

async fn on_callback_query(query: CallbackQuery, agent: Arc<BotAgent>) -> ResponseResult<()> {
    match handler::callback_to_event(&query) {
        Some(event) => deliver(&agent, event).await,
        None => debug!("ignoring callback query without data"),
    }
    respond(())
}

async fn deliver(agent: &BotAgent, event: InboundEvent) {
    if let Err(e) = agent.handle(event).await {
        error!(error = %e, "failed to handle update");
    }
}
