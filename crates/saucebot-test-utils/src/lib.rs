// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for saucebot integration tests.
//!
//! Provides fakes and harness infrastructure for fast, deterministic,
//! CI-runnable tests without Telegram or any live HTTP API.
//!
//! # Components
//!
//! - [`MemoryStorage`] - every storage trait over in-memory collections
//! - [`MockChat`] - chat platform that records sends, edits and callback answers
//! - [`TestHarness`] - a full [`saucebot_agent::BotAgent`] wired to the fakes and wiremock servers

pub mod harness;
pub mod memory_storage;
pub mod mock_chat;

pub use harness::{TestHarness, TestHarnessBuilder, e621_match};
pub use memory_storage::MemoryStorage;
pub use mock_chat::MockChat;
