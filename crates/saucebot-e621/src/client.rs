// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the e621 API.
//!
//! Every request carries the configured User-Agent (e621 rejects anonymous
//! agents). Authenticated requests use HTTP Basic with the user's name and
//! API key. There are no retries.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use saucebot_config::model::E621Config;
use saucebot_core::SauceError;
use saucebot_core::types::Credentials;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{ApiErrorBody, Post, PostEnvelope, PostsPage};

/// Largest page e621 serves from `/posts.json`.
pub const MAX_PAGE_SIZE: u32 = 320;

#[derive(Debug, Clone)]
pub struct E621Client {
    http: reqwest::Client,
    base_url: String,
}

impl E621Client {
    pub fn new(config: &E621Config) -> Result<Self, SauceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| SauceError::Config(format!("invalid e621 user agent: {e}")))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SauceError::ImageBoard {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Public page of a post, as shown to users.
    pub fn post_link(&self, post_id: &str) -> String {
        format!("{}/posts/{post_id}", self.base_url)
    }

    /// Probes `/posts.json?limit=1` with the credentials and returns the status.
    ///
    /// Only transport failures are errors; classifying the status is the caller's job.
    pub async fn check_credentials(&self, creds: &Credentials) -> Result<StatusCode, SauceError> {
        let url = self.url("/posts.json", &[("limit", "1")])?;
        let response = self
            .http
            .get(url)
            .basic_auth(&creds.username, Some(&creds.api_key))
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        debug!(status = %status, username = %creds.username, "credential probe answered");
        Ok(status)
    }

    pub async fn get_post(&self, creds: &Credentials, post_id: &str) -> Result<Post, SauceError> {
        let url = self.url(&format!("/posts/{post_id}.json"), &[])?;
        let envelope: PostEnvelope = self.get_json(url, creds).await?;
        Ok(envelope.post)
    }

    /// One page of the user's favorites, newest first.
    pub async fn favorite_posts(
        &self,
        creds: &Credentials,
        page: u32,
    ) -> Result<Vec<Post>, SauceError> {
        let tags = format!("fav:{}", creds.username);
        let limit = MAX_PAGE_SIZE.to_string();
        let page_number = page.to_string();
        let url = self.url(
            "/posts.json",
            &[
                ("tags", tags.as_str()),
                ("limit", limit.as_str()),
                ("page", page_number.as_str()),
            ],
        )?;
        let listing: PostsPage = self.get_json(url, creds).await?;
        Ok(listing.posts)
    }

    /// `POST /favorites.json` with multipart field `post_id`.
    ///
    /// A rejection carries e621's own message verbatim as the
    /// `SauceError::ImageBoard` message.
    pub async fn add_favorite(&self, creds: &Credentials, post_id: &str) -> Result<(), SauceError> {
        let url = self.url("/favorites.json", &[])?;
        let form = reqwest::multipart::Form::new().text("post_id", post_id.to_string());
        let response = self
            .http
            .post(url)
            .basic_auth(&creds.username, Some(&creds.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(post_id, "favorite added");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        creds: &Credentials,
    ) -> Result<T, SauceError> {
        let response = self
            .http
            .get(url)
            .basic_auth(&creds.username, Some(&creds.api_key))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| SauceError::ImageBoard {
            message: format!("failed to parse e621 response: {e}"),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, SauceError> {
        let raw = format!("{}{path}", self.base_url);
        let parsed = if query.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, query)
        };
        parsed.map_err(|e| SauceError::Config(format!("invalid e621 URL {raw}: {e}")))
    }
}

fn transport_error(e: reqwest::Error) -> SauceError {
    SauceError::ImageBoard {
        message: format!("e621 request failed: {e}"),
        status: e.status().map(|s| s.as_u16()),
        source: Some(Box::new(e)),
    }
}

/// Builds an error from a non-2xx response, preferring e621's own message.
fn api_error(status: StatusCode, body: &str) -> SauceError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.reason))
        .unwrap_or_else(|| format!("e621 returned {status}"));
    SauceError::ImageBoard {
        message,
        status: Some(status.as_u16()),
        source: None,
    }
}
