// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reverse image search through the FuzzySearch API.
//!
//! [`FuzzySearchClient`] performs the upload. [`ImageSearch`] wraps it with
//! the site allow-list, distance ordering, the search audit log and the
//! optional e621 liveness pass.

pub mod client;
pub mod filter;
pub mod service;

pub use client::FuzzySearchClient;
pub use filter::apply_allow_list;
pub use service::{ImageSearch, LivenessPass, SearchResults};
