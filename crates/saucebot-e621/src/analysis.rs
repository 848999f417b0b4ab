// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tag statistics over a user's favorites.

use std::collections::{HashMap, HashSet};

use saucebot_core::SauceError;
use saucebot_core::types::Credentials;
use tracing::debug;

use crate::client::{E621Client, MAX_PAGE_SIZE};
use crate::types::Post;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Counts tags across `posts`, skipping `exclude`, most frequent first.
///
/// Equal counts are ordered alphabetically so the table is stable.
pub fn top_tags(posts: &[Post], exclude: &[String], limit: usize) -> Vec<TagCount> {
    let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in posts.iter().flat_map(|p| p.all_tags()) {
        if !excluded.contains(tag) {
            *counts.entry(tag).or_default() += 1;
        }
    }

    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    ranked.truncate(limit);
    ranked
}

/// Fetches up to `max_pages` pages of favorites and ranks their tags.
pub async fn analyze_favorites(
    client: &E621Client,
    creds: &Credentials,
    max_pages: u32,
    exclude: &[String],
    limit: usize,
) -> Result<Vec<TagCount>, SauceError> {
    let mut posts = Vec::new();
    for page in 1..=max_pages {
        let batch = client.favorite_posts(creds, page).await?;
        let last = batch.len() < MAX_PAGE_SIZE as usize;
        posts.extend(batch);
        if last {
            break;
        }
    }
    debug!(username = %creds.username, posts = posts.len(), "favorites fetched");
    Ok(top_tags(&posts, exclude, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client, post_json};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn post(id: i64, general: &[&str]) -> Post {
        serde_json::from_value(post_json(id, false, general)).unwrap()
    }

    #[test]
    fn counts_and_ranks() {
        let posts = vec![
            post(1, &["solo", "smile"]),
            post(2, &["solo", "duo"]),
            post(3, &["solo"]),
        ];
        let top = top_tags(&posts, &[], 3);
        assert_eq!(top[0], TagCount { tag: "fox".into(), count: 3 });
        assert_eq!(top[1], TagCount { tag: "solo".into(), count: 3 });
        assert_eq!(top[2], TagCount { tag: "someone".into(), count: 3 });
    }

    #[test]
    fn excluded_tags_are_skipped() {
        let posts = vec![post(1, &["solo", "smile"]), post(2, &["smile"])];
        let exclude = vec!["fox".to_string(), "someone".to_string()];
        let top = top_tags(&posts, &exclude, 10);
        let tags: Vec<_> = top.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, ["smile", "solo"]);
    }

    #[test]
    fn zero_limit_is_empty() {
        assert!(top_tags(&[post(1, &["a"])], &[], 0).is_empty());
    }

    #[tokio::test]
    async fn short_page_stops_paging() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts.json"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "posts": [post_json(1, false, &["solo"])]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/posts.json"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"posts": []})))
            .expect(0)
            .mount(&server)
            .await;

        let top = analyze_favorites(
            &client(&server.uri()),
            &Credentials::new("fox", "k"),
            4,
            &[],
            10,
        )
        .await
        .unwrap();
        assert!(top.iter().any(|t| t.tag == "solo" && t.count == 1));
    }
}
