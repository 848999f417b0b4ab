// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! e621 API response types. Only the fields the bot reads are modelled.

use std::collections::BTreeMap;

use serde::Deserialize;

/// One post as returned by `/posts.json` and `/posts/<id>.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Post {
    pub id: i64,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub score: Option<PostScore>,
    #[serde(default)]
    pub fav_count: Option<i64>,
    #[serde(default)]
    pub flags: PostFlags,
    /// Tags grouped by category (`general`, `species`, `artist`, ...).
    #[serde(default)]
    pub tags: BTreeMap<String, Vec<String>>,
}

impl Post {
    pub fn is_deleted(&self) -> bool {
        self.flags.deleted
    }

    /// Every tag across all categories.
    pub fn all_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.values().flatten().map(String::as_str)
    }

    pub fn rating_label(&self) -> &'static str {
        match self.rating.as_deref() {
            Some("s") => "safe",
            Some("q") => "questionable",
            Some("e") => "explicit",
            _ => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PostFlags {
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PostScore {
    #[serde(default)]
    pub up: i64,
    #[serde(default)]
    pub down: i64,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostEnvelope {
    pub post: Post,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostsPage {
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Error body e621 sends with 4xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}
