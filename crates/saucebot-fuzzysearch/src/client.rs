// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the FuzzySearch image endpoint.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use saucebot_config::model::FuzzySearchConfig;
use saucebot_core::SauceError;
use saucebot_core::types::SearchMatch;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FuzzySearchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl FuzzySearchClient {
    /// Builds a client. Fails when no API key is configured.
    pub fn new(config: &FuzzySearchConfig) -> Result<Self, SauceError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SauceError::Config("fuzzysearch.api_key is not set".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| SauceError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| search_error("failed to build HTTP client", e))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Uploads `image` and returns every match within `max_distance`, in API order.
    pub async fn search_image(
        &self,
        max_distance: u32,
        image: Vec<u8>,
        file_name: String,
    ) -> Result<Vec<SearchMatch>, SauceError> {
        let form = Form::new()
            .text("distance", max_distance.to_string())
            .part("image", Part::bytes(image).file_name(file_name));

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| search_error("search request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| search_error("failed to read search response", e))?;
        debug!(status = %status, bytes = body.len(), "search response received");

        if !status.is_success() {
            return Err(SauceError::Search {
                message: format!("search API returned {status}"),
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| SauceError::Search {
            message: format!("failed to parse search response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn search_error(context: &str, e: reqwest::Error) -> SauceError {
    SauceError::Search {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}
