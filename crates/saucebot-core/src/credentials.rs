// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user credential lifecycle on top of a [`CredentialRepository`].
//!
//! Writes are best-effort from the caller's point of view: storage failures
//! are logged and swallowed so a command reply is never blocked by them.
//! Reads surface errors so callers can tell "absent" from "unknown".

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::SauceError;
use crate::traits::CredentialRepository;
use crate::types::{CredentialPatch, CredentialState, UserCredential, UserId};

/// Credential store handed to every component that needs a user's login.
#[derive(Clone)]
pub struct CredentialStore {
    repo: Arc<dyn CredentialRepository>,
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn CredentialRepository>) -> Self {
        Self { repo }
    }

    /// Merges `patch` into the user's record, creating it if needed.
    ///
    /// Fields absent from the patch keep their stored value.
    pub async fn upsert(&self, user_id: UserId, patch: CredentialPatch) {
        if patch.is_empty() {
            return;
        }
        match self.repo.upsert_credential(user_id, &patch).await {
            Ok(()) => debug!(user_id = user_id.0, "credential record updated"),
            Err(e) => error!(user_id = user_id.0, error = %e, "failed to update credential record"),
        }
    }

    pub async fn get(&self, user_id: UserId) -> Result<Option<UserCredential>, SauceError> {
        self.repo.get_credential(user_id).await
    }

    /// Removes the user's record. A missing record is not an error.
    pub async fn delete(&self, user_id: UserId) -> Result<(), SauceError> {
        self.repo.delete_credential(user_id).await
    }

    /// True iff both username and API key are stored.
    ///
    /// A lookup failure is logged and reported as `false`, which hides the
    /// favorite button rather than offering one that cannot work.
    pub async fn is_complete(&self, user_id: UserId) -> bool {
        self.state(user_id).await == CredentialState::Complete
    }

    pub async fn state(&self, user_id: UserId) -> CredentialState {
        match self.get(user_id).await {
            Ok(record) => CredentialState::of(record.as_ref()),
            Err(e) => {
                error!(user_id = user_id.0, error = %e, "failed to read credential record");
                CredentialState::Absent
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;

    /// Map-backed repository with an optional failure switch.
    #[derive(Default)]
    pub(crate) struct MapRepo {
        pub records: Mutex<HashMap<UserId, UserCredential>>,
        pub fail_writes: bool,
    }

    #[async_trait]
    impl CredentialRepository for MapRepo {
        async fn upsert_credential(
            &self,
            user_id: UserId,
            patch: &CredentialPatch,
        ) -> Result<(), SauceError> {
            if self.fail_writes {
                return Err(SauceError::Storage {
                    source: "disk full".into(),
                });
            }
            let mut records = self.records.lock().await;
            let entry = records.entry(user_id).or_insert_with(|| UserCredential {
                user_id,
                username: None,
                api_key: None,
            });
            if let Some(u) = &patch.username {
                entry.username = Some(u.clone());
            }
            if let Some(k) = &patch.api_key {
                entry.api_key = Some(k.clone());
            }
            Ok(())
        }

        async fn get_credential(
            &self,
            user_id: UserId,
        ) -> Result<Option<UserCredential>, SauceError> {
            Ok(self.records.lock().await.get(&user_id).cloned())
        }

        async fn delete_credential(&self, user_id: UserId) -> Result<(), SauceError> {
            self.records.lock().await.remove(&user_id);
            Ok(())
        }
    }

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MapRepo::default()))
    }

    #[tokio::test]
    async fn absent_user_is_not_complete() {
        let store = store();
        assert!(!store.is_complete(UserId(1)).await);
        assert_eq!(store.state(UserId(1)).await, CredentialState::Absent);
        assert!(store.get(UserId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn partial_record_is_distinguishable() {
        let store = store();
        store.upsert(UserId(1), CredentialPatch::username("fox")).await;
        assert_eq!(store.state(UserId(1)).await, CredentialState::Partial);
        assert!(!store.is_complete(UserId(1)).await);
    }

    #[tokio::test]
    async fn upsert_never_clears_missing_fields() {
        let store = store();
        store.upsert(UserId(7), CredentialPatch::username("fox")).await;
        store.upsert(UserId(7), CredentialPatch::api_key("k1")).await;
        assert!(store.is_complete(UserId(7)).await);

        // Overwriting only the key keeps the username.
        store.upsert(UserId(7), CredentialPatch::api_key("k2")).await;
        let record = store.get(UserId(7)).await.unwrap().unwrap();
        assert_eq!(record.username.as_deref(), Some("fox"));
        assert_eq!(record.api_key.as_deref(), Some("k2"));
        assert!(store.is_complete(UserId(7)).await);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = store();
        store.delete(UserId(3)).await.unwrap();
        store.upsert(UserId(3), CredentialPatch::username("a")).await;
        store.delete(UserId(3)).await.unwrap();
        store.delete(UserId(3)).await.unwrap();
        assert!(store.get(UserId(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn failed_write_is_logged_not_raised() {
        let store = CredentialStore::new(Arc::new(MapRepo {
            fail_writes: true,
            ..Default::default()
        }));
        store.upsert(UserId(9), CredentialPatch::username("x")).await;
        assert!(logs_contain("failed to update credential record"));
        assert!(store.get(UserId(9)).await.unwrap().is_none());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let record = UserCredential {
            user_id: UserId(1),
            username: Some("fox".into()),
            api_key: Some("super-secret".into()),
        };
        let out = format!("{record:?}");
        assert!(out.contains("fox"));
        assert!(!out.contains("super-secret"));
    }
}
