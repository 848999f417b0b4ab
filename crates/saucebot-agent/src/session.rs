// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Last top match per chat, for favorite buttons that carry no post id.
//!
//! Entries expire after a TTL. When the map is full, expired entries are
//! dropped first and then the oldest survivors until there is room.
//!
//! The capacity is a soft bound: the fullness check and the insert are not
//! one atomic step, so concurrent `remember` calls for different chats can
//! briefly push the map past it.

use std::time::Duration;

use dashmap::DashMap;
use saucebot_core::types::{ChatId, SearchMatch};
use tokio::time::Instant;
use tracing::debug;

struct SessionEntry {
    top: SearchMatch,
    stored_at: Instant,
}

pub struct SessionMap {
    entries: DashMap<ChatId, SessionEntry>,
    ttl: Duration,
    capacity: usize,
}

impl SessionMap {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Stores `top` as the chat's current match, replacing any earlier one.
    pub fn remember(&self, chat_id: ChatId, top: SearchMatch) {
        if !self.entries.contains_key(&chat_id) && self.entries.len() >= self.capacity {
            self.make_room();
        }
        self.entries.insert(
            chat_id,
            SessionEntry {
                top,
                stored_at: Instant::now(),
            },
        );
    }

    /// The chat's match, unless it is missing or older than the TTL.
    pub fn get(&self, chat_id: ChatId) -> Option<SearchMatch> {
        {
            let entry = self.entries.get(&chat_id)?;
            if entry.stored_at.elapsed() < self.ttl {
                return Some(entry.top.clone());
            }
        }
        // The read guard must be gone before removing from the same shard.
        let ttl = self.ttl;
        self.entries
            .remove_if(&chat_id, |_, e| e.stored_at.elapsed() >= ttl);
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, e| e.stored_at.elapsed() < ttl);

        while self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.stored_at)
                .map(|e| *e.key());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
        debug!(
            // Other chats may have been inserted concurrently.
            evicted = before.saturating_sub(self.entries.len()),
            remaining = self.entries.len(),
            "session map trimmed"
        );
    }
}
