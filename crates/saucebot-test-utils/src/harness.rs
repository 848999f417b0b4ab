// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete [`BotAgent`] against a mock chat
//! platform, wiremock stand-ins for FuzzySearch and e621, a temp photo
//! directory, and either in-memory or temp SQLite storage. Events are fed
//! through [`BotAgent::handle`], exactly as the Telegram dispatcher does.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;

use saucebot_agent::BotAgent;
use saucebot_config::model::{SaucebotConfig, StorageConfig};
use saucebot_config::FavoriteCallback;
use saucebot_core::types::{
    BotCommand, ChatId, InboundEvent, MessageId, MessageRef, PhotoMessage, Sender, UserId,
};
use saucebot_core::{SauceError, StorageAdapter};
use saucebot_storage::SqliteStorage;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::memory_storage::MemoryStorage;
use crate::mock_chat::MockChat;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    sqlite: bool,
    search_timeout_secs: u64,
    favorite_callback: FavoriteCallback,
    admin_chat_id: Option<i64>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            sqlite: false,
            search_timeout_secs: 5,
            favorite_callback: FavoriteCallback::PostId,
            admin_chat_id: None,
        }
    }

    /// Store credentials and logs in a temp SQLite file instead of memory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// HTTP timeout of the FuzzySearch client.
    pub fn with_search_timeout(mut self, secs: u64) -> Self {
        self.search_timeout_secs = secs;
        self
    }

    pub fn with_favorite_callback(mut self, mode: FavoriteCallback) -> Self {
        self.favorite_callback = mode;
        self
    }

    pub fn with_admin_chat(mut self, chat_id: i64) -> Self {
        self.admin_chat_id = Some(chat_id);
        self
    }

    /// Starts the mock servers and builds the agent.
    pub async fn build(self) -> Result<TestHarness, SauceError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| SauceError::Io {
            message: "cannot create harness temp dir".into(),
            source: e,
        })?;
        let fuzzysearch = MockServer::start().await;
        let e621 = MockServer::start().await;

        let mut config = SaucebotConfig::default();
        config.bot.photo_dir = temp_dir.path().join("photos").to_string_lossy().into_owned();
        config.bot.favorite_callback = self.favorite_callback;
        config.bot.admin_chat_id = self.admin_chat_id;
        config.fuzzysearch.api_key = Some("test-fuzzysearch-key".into());
        config.fuzzysearch.endpoint = format!("{}/v1/image", fuzzysearch.uri());
        config.fuzzysearch.timeout_secs = self.search_timeout_secs;
        config.e621.base_url = e621.uri();
        config.e621.timeout_secs = 5;
        config.storage = StorageConfig {
            database_path: temp_dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };

        let (storage, memory): (Arc<dyn StorageAdapter>, Option<Arc<MemoryStorage>>) =
            if self.sqlite {
                let sqlite = SqliteStorage::new(config.storage.clone());
                sqlite.initialize().await?;
                (Arc::new(sqlite), None)
            } else {
                let memory = Arc::new(MemoryStorage::new());
                (memory.clone(), Some(memory))
            };

        let chat = Arc::new(MockChat::new());
        let agent = BotAgent::from_config(&config, chat.clone(), Arc::clone(&storage))?;

        Ok(TestHarness {
            agent,
            chat,
            storage,
            memory,
            fuzzysearch,
            e621,
            config,
            next_message_id: AtomicI32::new(1),
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment around one [`BotAgent`].
///
/// Every test user talks to the bot in a private chat whose id equals the
/// user id.
pub struct TestHarness {
    pub agent: BotAgent,
    pub chat: Arc<MockChat>,
    pub storage: Arc<dyn StorageAdapter>,
    /// Set when the harness runs on in-memory storage.
    pub memory: Option<Arc<MemoryStorage>>,
    pub fuzzysearch: MockServer,
    pub e621: MockServer,
    pub config: SaucebotConfig,
    next_message_id: AtomicI32,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub fn sender(user: UserId) -> Sender {
        Sender {
            id: user,
            first_name: format!("user{}", user.0),
            username: Some(format!("user{}", user.0)),
        }
    }

    pub fn chat_of(user: UserId) -> ChatId {
        ChatId(user.0)
    }

    /// Sends a photo from `user` and returns it.
    pub async fn send_photo(&self, user: UserId) -> Result<PhotoMessage, SauceError> {
        let message_id = self.next_message_id();
        let file_id = format!("photo-{}", message_id.0);
        self.chat.add_file(&file_id, b"\xff\xd8\xff\xe0 fake jpeg".to_vec());
        let photo = PhotoMessage {
            chat_id: Self::chat_of(user),
            message_id,
            user_id: Some(user),
            file_id,
        };
        self.agent.handle(InboundEvent::Photo(photo.clone())).await?;
        Ok(photo)
    }

    pub async fn command(&self, user: UserId, command: BotCommand) -> Result<(), SauceError> {
        let event = InboundEvent::Command {
            chat_id: Self::chat_of(user),
            message_id: self.next_message_id(),
            sender: Self::sender(user),
            command,
            replied_photo: None,
        };
        self.agent.handle(event).await
    }

    /// Presses the first button of the keyboard attached to `message`.
    pub async fn press_button(&self, user: UserId, message: MessageRef) -> Result<(), SauceError> {
        let data = self
            .chat
            .sent_keyboard(message)
            .and_then(|k| k.rows.first().and_then(|row| row.first()).map(|b| b.data.clone()))
            .ok_or_else(|| SauceError::Internal(format!("no button on {message:?}")))?;
        let event = InboundEvent::Callback {
            callback_id: format!("cb-{}", message.message_id.0),
            sender: Self::sender(user),
            message: Some(message),
            data,
        };
        self.agent.handle(event).await
    }

    /// Where the agent stores the photo while it is searched.
    pub fn photo_path(&self, photo: &PhotoMessage) -> PathBuf {
        self.agent.images().path_for(photo.chat_id, photo.message_id)
    }

    /// Answers every search with `matches`.
    pub async fn mount_search_results(&self, matches: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/v1/image"))
            .respond_with(ResponseTemplate::new(200).set_body_json(matches))
            .mount(&self.fuzzysearch)
            .await;
    }

    /// Answers every search only after `delay`.
    pub async fn mount_slow_search(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/v1/image"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(delay),
            )
            .mount(&self.fuzzysearch)
            .await;
    }

    /// Accepts any credentials and reports every post as live.
    pub async fn mount_valid_credentials(&self) {
        Mock::given(method("GET"))
            .and(path("/posts.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"posts": []})))
            .mount(&self.e621)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/posts/\d+\.json$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "post": {"id": 0, "flags": {"deleted": false, "pending": false}}
            })))
            .mount(&self.e621)
            .await;
    }

    pub async fn mount_add_favorite(&self) {
        Mock::given(method("POST"))
            .and(path("/favorites.json"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"success": true})))
            .mount(&self.e621)
            .await;
    }

    fn next_message_id(&self) -> MessageId {
        MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }
}

/// One FuzzySearch record for an e621 post.
pub fn e621_match(id: &str, distance: u64) -> serde_json::Value {
    serde_json::json!({
        "site": "e621",
        "site_id": id.parse::<i64>().unwrap_or_default(),
        "site_id_str": id,
        "distance": distance,
        "url": format!("https://static1.e621.net/data/{id}.png"),
        "tags": ["fox"],
        "artists": ["someone"],
        "rating": "safe"
    })
}
