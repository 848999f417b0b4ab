// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage backend.
//!
//! Implements every storage trait with plain collections behind a mutex, so
//! tests can inspect exactly what was written. Audit writes happen on
//! background tasks; use the `wait_for_*` helpers before asserting on them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use saucebot_core::types::{
    CredentialPatch, ErrorReport, LogEvent, SearchMatch, UserCredential, UserId,
};
use saucebot_core::{CredentialRepository, EventLog, SauceError, StorageAdapter};

const WAIT_STEP: Duration = Duration::from_millis(10);
const WAIT_LIMIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct State {
    credentials: HashMap<UserId, UserCredential>,
    events: Vec<LogEvent>,
    searches: Vec<(Option<UserId>, Vec<SearchMatch>)>,
    reports: Vec<ErrorReport>,
}

#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every trait call fails with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn credential(&self, user_id: UserId) -> Option<UserCredential> {
        self.state().credentials.get(&user_id).cloned()
    }

    /// Chat events, excluding search result sets.
    pub fn events(&self) -> Vec<LogEvent> {
        self.state().events.clone()
    }

    /// Logged search result sets with the requesting user.
    pub fn searches(&self) -> Vec<(Option<UserId>, Vec<SearchMatch>)> {
        self.state().searches.clone()
    }

    pub fn error_reports(&self) -> Vec<ErrorReport> {
        self.state().reports.clone()
    }

    pub async fn wait_for_events(&self, count: usize) {
        self.wait_until("chat events", count, |s| s.events.len()).await;
    }

    pub async fn wait_for_searches(&self, count: usize) {
        self.wait_until("searches", count, |s| s.searches.len()).await;
    }

    pub async fn wait_for_error_reports(&self, count: usize) {
        self.wait_until("error reports", count, |s| s.reports.len()).await;
    }

    async fn wait_until(&self, what: &str, count: usize, len: impl Fn(&State) -> usize) {
        let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
        loop {
            let current = len(&self.state());
            if current >= count {
                return;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("expected {count} {what}, found {current}");
            }
            tokio::time::sleep(WAIT_STEP).await;
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), SauceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SauceError::Storage {
                source: "memory storage set to fail".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for MemoryStorage {
    async fn upsert_credential(
        &self,
        user_id: UserId,
        patch: &CredentialPatch,
    ) -> Result<(), SauceError> {
        self.check()?;
        let mut state = self.state();
        let record = state
            .credentials
            .entry(user_id)
            .or_insert_with(|| UserCredential {
                user_id,
                username: None,
                api_key: None,
            });
        if let Some(username) = &patch.username {
            record.username = Some(username.clone());
        }
        if let Some(api_key) = &patch.api_key {
            record.api_key = Some(api_key.clone());
        }
        Ok(())
    }

    async fn get_credential(&self, user_id: UserId) -> Result<Option<UserCredential>, SauceError> {
        self.check()?;
        Ok(self.credential(user_id))
    }

    async fn delete_credential(&self, user_id: UserId) -> Result<(), SauceError> {
        self.check()?;
        self.state().credentials.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl EventLog for MemoryStorage {
    async fn log_event(&self, event: &LogEvent, _at: DateTime<Utc>) -> Result<(), SauceError> {
        self.check()?;
        let mut state = self.state();
        match event {
            LogEvent::Search { user_id, results } => {
                state.searches.push((*user_id, results.clone()));
            }
            other => state.events.push(other.clone()),
        }
        Ok(())
    }

    async fn record_error_report(
        &self,
        report: &ErrorReport,
        _at: DateTime<Utc>,
    ) -> Result<(), SauceError> {
        self.check()?;
        self.state().reports.push(report.clone());
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    async fn initialize(&self) -> Result<(), SauceError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), SauceError> {
        Ok(())
    }
}
