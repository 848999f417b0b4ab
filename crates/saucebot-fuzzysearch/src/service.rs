// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The search operation the bot calls for every photo.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use saucebot_core::events::record_in_background;
use saucebot_core::types::{LogEvent, SearchMatch, Site, UserId, ValidationResult};
use saucebot_core::{EventLog, SauceError};
use saucebot_e621::{CredentialValidator, E621Client, Unverified, filter_live};
use tracing::{debug, info, warn};

use crate::client::FuzzySearchClient;
use crate::filter::apply_allow_list;

/// What happened to the liveness pass of one search.
#[derive(Debug, Clone, PartialEq)]
pub enum LivenessPass {
    /// No requesting user, e621 not allowed, or credentials not valid.
    Skipped,
    Applied {
        removed: Vec<SearchMatch>,
        unverified: Vec<Unverified>,
    },
    /// The pass ran out of time; results are the pre-liveness list.
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// Allowed matches, closest first.
    pub results: Vec<SearchMatch>,
    pub liveness: LivenessPass,
}

pub struct ImageSearch {
    client: FuzzySearchClient,
    events: Arc<dyn EventLog>,
    validator: CredentialValidator,
    e621: E621Client,
    liveness_timeout: Duration,
}

impl ImageSearch {
    pub fn new(
        client: FuzzySearchClient,
        events: Arc<dyn EventLog>,
        validator: CredentialValidator,
        e621: E621Client,
        liveness_timeout: Duration,
    ) -> Self {
        Self {
            client,
            events,
            validator,
            e621,
            liveness_timeout,
        }
    }

    /// Searches for the image at `image_path`.
    ///
    /// Any failure reading the file or talking to the API is one
    /// [`SauceError::Search`]; no partial results are returned. The filtered
    /// list is written to the search log in the background.
    pub async fn search(
        &self,
        max_distance: u32,
        image_path: &Path,
        allowed_sites: &[Site],
        requesting_user: Option<UserId>,
    ) -> Result<SearchResults, SauceError> {
        let image = tokio::fs::read(image_path).await.map_err(|e| SauceError::Search {
            message: format!("cannot read image {}: {e}", image_path.display()),
            source: Some(Box::new(e)),
        })?;
        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpg")
            .to_string();

        let raw = self.client.search_image(max_distance, image, file_name).await?;
        let raw_count = raw.len();
        let filtered = apply_allow_list(raw, allowed_sites);
        info!(
            raw = raw_count,
            kept = filtered.len(),
            max_distance,
            "search finished"
        );

        record_in_background(
            Arc::clone(&self.events),
            LogEvent::Search {
                user_id: requesting_user,
                results: filtered.clone(),
            },
        );

        let liveness_wanted = requesting_user.is_some() && allowed_sites.contains(&Site::E621);
        if !liveness_wanted || filtered.is_empty() {
            return Ok(SearchResults {
                results: filtered,
                liveness: LivenessPass::Skipped,
            });
        }

        let creds = match self.validator.validate_for_user(requesting_user).await {
            ValidationResult::Valid(creds) => creds,
            ValidationResult::Invalid(kind) => {
                debug!(reason = %kind, "skipping liveness pass");
                return Ok(SearchResults {
                    results: filtered,
                    liveness: LivenessPass::Skipped,
                });
            }
        };

        let pass = filter_live(&self.e621, &creds, filtered.clone());
        match tokio::time::timeout(self.liveness_timeout, pass).await {
            Ok(report) => Ok(SearchResults {
                results: report.kept,
                liveness: LivenessPass::Applied {
                    removed: report.removed,
                    unverified: report.unverified,
                },
            }),
            Err(_) => {
                warn!(timeout = ?self.liveness_timeout, "liveness pass timed out");
                Ok(SearchResults {
                    results: filtered,
                    liveness: LivenessPass::TimedOut,
                })
            }
        }
    }
}
