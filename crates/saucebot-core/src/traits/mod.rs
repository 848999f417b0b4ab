// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the orchestrator and its collaborators.
//!
//! Both traits use `#[async_trait]` so they can be held as trait objects
//! and swapped for in-memory fakes in tests.

pub mod chat;
pub mod storage;

pub use chat::ChatPlatform;
pub use storage::{CredentialRepository, EventLog, StorageAdapter};
