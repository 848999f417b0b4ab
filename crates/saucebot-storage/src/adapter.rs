// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the storage traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use saucebot_config::model::StorageConfig;
use saucebot_core::types::{CredentialPatch, ErrorReport, LogEvent, UserCredential, UserId};
use saucebot_core::{CredentialRepository, EventLog, SauceError, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// call fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// The open database, for callers that need raw queries.
    pub fn database(&self) -> Result<&Database, SauceError> {
        self.db.get().ok_or_else(|| SauceError::Storage {
            source: "storage not initialized; call initialize() first".into(),
        })
    }
}

#[async_trait]
impl CredentialRepository for SqliteStorage {
    async fn upsert_credential(
        &self,
        user_id: UserId,
        patch: &CredentialPatch,
    ) -> Result<(), SauceError> {
        queries::credentials::upsert(self.database()?, user_id, patch).await
    }

    async fn get_credential(&self, user_id: UserId) -> Result<Option<UserCredential>, SauceError> {
        queries::credentials::get(self.database()?, user_id).await
    }

    async fn delete_credential(&self, user_id: UserId) -> Result<(), SauceError> {
        let removed = queries::credentials::delete(self.database()?, user_id).await?;
        debug!(user_id = user_id.0, removed, "credential delete");
        Ok(())
    }
}

#[async_trait]
impl EventLog for SqliteStorage {
    async fn log_event(&self, event: &LogEvent, at: DateTime<Utc>) -> Result<(), SauceError> {
        queries::events::append_event(self.database()?, event, at).await
    }

    async fn record_error_report(
        &self,
        report: &ErrorReport,
        at: DateTime<Utc>,
    ) -> Result<(), SauceError> {
        queries::events::append_error_report(self.database()?, report, at).await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), SauceError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| SauceError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SauceError> {
        if self.config.wal_mode {
            self.database()?.checkpoint().await?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucebot_core::types::{ChatId, MessageId};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn make_config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn initialize_creates_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init.db");
        let storage = SqliteStorage::new(make_config(&db_path));

        assert_eq!(storage.name(), "sqlite");
        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_fails() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(&dir.path().join("twice.db")));
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn calls_before_initialize_fail() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(make_config(&dir.path().join("lazy.db")));
        assert!(storage.get_credential(UserId(1)).await.is_err());
    }

    #[tokio::test]
    async fn credential_lifecycle_through_trait_objects() {
        let dir = tempdir().unwrap();
        let storage = Arc::new(SqliteStorage::new(make_config(&dir.path().join("life.db"))));
        storage.initialize().await.unwrap();
        let repo: Arc<dyn CredentialRepository> = storage.clone();

        repo.upsert_credential(UserId(5), &CredentialPatch::username("otter"))
            .await
            .unwrap();
        repo.upsert_credential(UserId(5), &CredentialPatch::api_key("secret"))
            .await
            .unwrap();
        let stored = repo.get_credential(UserId(5)).await.unwrap().unwrap();
        assert!(stored.is_complete());

        repo.delete_credential(UserId(5)).await.unwrap();
        repo.delete_credential(UserId(5)).await.unwrap();
        assert!(repo.get_credential(UserId(5)).await.unwrap().is_none());

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn events_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        {
            let storage = SqliteStorage::new(make_config(&path));
            storage.initialize().await.unwrap();
            let event = LogEvent::PhotoReceived {
                chat_id: ChatId(1),
                message_id: MessageId(2),
                user_id: Some(UserId(3)),
            };
            storage.log_event(&event, Utc::now()).await.unwrap();
            storage.close().await.unwrap();
        }
        let storage = SqliteStorage::new(make_config(&path));
        storage.initialize().await.unwrap();
        let rows = queries::events::recent_events(storage.database().unwrap(), 5)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "photo_received");
    }
}
