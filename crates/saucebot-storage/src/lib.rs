// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for saucebot.
//!
//! One database file holds the credential table and the three append-only
//! audit tables. Every statement runs on tokio-rusqlite's single background
//! thread, so writes never contend with each other.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
