// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat platform for deterministic testing.
//!
//! `MockChat` records every outbound call for assertions and serves file
//! downloads from an in-memory table. Downloading an unregistered file id
//! fails, which is how tests simulate a broken download.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use saucebot_core::types::{Keyboard, MessageId, MessageRef, OutboundMessage};
use saucebot_core::{ChatPlatform, SauceError};

/// First id handed out for sent messages.
const FIRST_MESSAGE_ID: i32 = 1000;

#[derive(Default)]
struct Recorded {
    sent: Vec<(MessageRef, OutboundMessage)>,
    edits: Vec<(MessageRef, Option<Keyboard>)>,
    answered: Vec<String>,
    files: HashMap<String, Vec<u8>>,
    next_id: i32,
}

#[derive(Default)]
pub struct MockChat {
    inner: Mutex<Recorded>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `file_id` downloadable with the given contents.
    pub fn add_file(&self, file_id: &str, bytes: Vec<u8>) {
        self.inner().files.insert(file_id.to_string(), bytes);
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.inner().sent.iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn last_sent(&self) -> Option<OutboundMessage> {
        self.inner().sent.last().map(|(_, m)| m.clone())
    }

    /// Reference of the most recent sent message, as returned by `send`.
    pub fn last_sent_ref(&self) -> Option<MessageRef> {
        self.inner().sent.last().map(|(r, _)| *r)
    }

    /// Keyboard attached to the sent message `target`, if any.
    pub fn sent_keyboard(&self, target: MessageRef) -> Option<Keyboard> {
        self.inner()
            .sent
            .iter()
            .find(|(r, _)| *r == target)
            .and_then(|(_, m)| m.keyboard.clone())
    }

    pub fn edits(&self) -> Vec<(MessageRef, Option<Keyboard>)> {
        self.inner().edits.clone()
    }

    pub fn answered(&self) -> Vec<String> {
        self.inner().answered.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.inner();
        inner.sent.clear();
        inner.edits.clear();
        inner.answered.clear();
    }

    fn inner(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ChatPlatform for MockChat {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageRef, SauceError> {
        let mut inner = self.inner();
        let reference = MessageRef {
            chat_id: msg.chat_id,
            message_id: MessageId(FIRST_MESSAGE_ID + inner.next_id),
        };
        inner.next_id += 1;
        inner.sent.push((reference, msg));
        Ok(reference)
    }

    async fn edit_keyboard(
        &self,
        target: MessageRef,
        keyboard: Option<Keyboard>,
    ) -> Result<(), SauceError> {
        self.inner().edits.push((target, keyboard));
        Ok(())
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>, SauceError> {
        self.inner()
            .files
            .get(file_id)
            .cloned()
            .ok_or_else(|| SauceError::Channel {
                message: format!("unknown file id {file_id}"),
                source: None,
            })
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), SauceError> {
        self.inner().answered.push(callback_id.to_string());
        Ok(())
    }
}
