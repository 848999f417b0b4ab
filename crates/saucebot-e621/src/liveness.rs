// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Drops search matches whose e621 post has been deleted.
//!
//! Every e621 match is re-fetched concurrently with the user's credentials.
//! Matches from other sites pass through untouched. A fetch that fails
//! keeps its match: a deleted post is only assumed when e621 says so.

use futures::future::join_all;
use saucebot_core::types::{Credentials, SearchMatch, Site};
use tracing::{debug, warn};

use crate::client::E621Client;

/// A match kept without confirmation, and why it could not be checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Unverified {
    pub external_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LivenessReport {
    /// Surviving matches, in input order. Includes unverified ones.
    pub kept: Vec<SearchMatch>,
    /// Matches whose post is flagged deleted.
    pub removed: Vec<SearchMatch>,
    pub unverified: Vec<Unverified>,
}

enum Verdict {
    Live,
    Deleted,
    Unknown(String),
}

pub async fn filter_live(
    client: &E621Client,
    creds: &Credentials,
    matches: Vec<SearchMatch>,
) -> LivenessReport {
    let verdicts = join_all(matches.iter().map(|m| check(client, creds, m))).await;

    let mut report = LivenessReport::default();
    for (candidate, verdict) in matches.into_iter().zip(verdicts) {
        match verdict {
            Verdict::Live => report.kept.push(candidate),
            Verdict::Deleted => {
                debug!(post_id = %candidate.external_id, "dropping deleted post");
                report.removed.push(candidate);
            }
            Verdict::Unknown(reason) => {
                warn!(post_id = %candidate.external_id, %reason, "keeping unverified match");
                report.unverified.push(Unverified {
                    external_id: candidate.external_id.clone(),
                    reason,
                });
                report.kept.push(candidate);
            }
        }
    }
    report
}

async fn check(client: &E621Client, creds: &Credentials, candidate: &SearchMatch) -> Verdict {
    if candidate.site != Site::E621 {
        return Verdict::Live;
    }
    match client.get_post(creds, &candidate.external_id).await {
        Ok(post) if post.is_deleted() => Verdict::Deleted,
        Ok(_) => Verdict::Live,
        Err(e) => Verdict::Unknown(e.to_string()),
    }
}
