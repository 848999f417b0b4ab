// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform trait (Telegram in production, a mock in tests).

use async_trait::async_trait;

use crate::error::SauceError;
use crate::types::{Keyboard, MessageRef, OutboundMessage};

/// Outbound operations the orchestrator needs from a messaging platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync + 'static {
    /// Sends a message and returns a reference to it.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageRef, SauceError>;

    /// Replaces (or removes, with `None`) the inline keyboard of a sent message.
    async fn edit_keyboard(
        &self,
        target: MessageRef,
        keyboard: Option<Keyboard>,
    ) -> Result<(), SauceError>;

    /// Downloads a file by its platform identifier.
    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, SauceError>;

    /// Acknowledges a button press so the client stops its loading spinner.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), SauceError>;
}
