// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for credential records and append-only audit logs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SauceError;
use crate::types::{CredentialPatch, ErrorReport, LogEvent, UserCredential, UserId};

/// Keyed access to per-user image-board credentials.
///
/// All access is single-record; no operation spans more than one user.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Merges the `Some` fields of `patch` into the record, creating it if absent.
    async fn upsert_credential(
        &self,
        user_id: UserId,
        patch: &CredentialPatch,
    ) -> Result<(), SauceError>;

    async fn get_credential(&self, user_id: UserId) -> Result<Option<UserCredential>, SauceError>;

    /// Removes the record. Succeeds when no record exists.
    async fn delete_credential(&self, user_id: UserId) -> Result<(), SauceError>;
}

/// Append-only audit collections.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Appends a chat event or search result set with its timestamp.
    async fn log_event(&self, event: &LogEvent, at: DateTime<Utc>) -> Result<(), SauceError>;

    /// Appends a user-submitted problem report.
    async fn record_error_report(
        &self,
        report: &ErrorReport,
        at: DateTime<Utc>,
    ) -> Result<(), SauceError>;
}

/// A complete storage backend.
#[async_trait]
pub trait StorageAdapter: CredentialRepository + EventLog + 'static {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Opens connections and applies migrations.
    async fn initialize(&self) -> Result<(), SauceError>;

    /// Flushes pending writes and releases connections.
    async fn close(&self) -> Result<(), SauceError>;
}
