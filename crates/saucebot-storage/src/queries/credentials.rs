// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential record statements.

use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use saucebot_core::SauceError;
use saucebot_core::types::{CredentialPatch, UserCredential, UserId};

use crate::database::{Database, map_tr_err};
use crate::queries::timestamp;

/// Merges the patch into the user's row. `NULL` patch fields keep the stored value.
pub async fn upsert(
    db: &Database,
    user_id: UserId,
    patch: &CredentialPatch,
) -> Result<(), SauceError> {
    let CredentialPatch { username, api_key } = patch.clone();
    let now = timestamp(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO credentials (user_id, username, api_key, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                     username = COALESCE(excluded.username, credentials.username),
                     api_key = COALESCE(excluded.api_key, credentials.api_key),
                     updated_at = excluded.updated_at",
                params![user_id.0, username, api_key, now],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get(db: &Database, user_id: UserId) -> Result<Option<UserCredential>, SauceError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT username, api_key FROM credentials WHERE user_id = ?1",
                params![user_id.0],
                |row| {
                    Ok(UserCredential {
                        user_id,
                        username: row.get(0)?,
                        api_key: row.get(1)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes the user's row. Deleting a missing row is not an error.
pub async fn delete(db: &Database, user_id: UserId) -> Result<bool, SauceError> {
    db.connection()
        .call(move |conn| {
            let removed = conn.execute(
                "DELETE FROM credentials WHERE user_id = ?1",
                params![user_id.0],
            )?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_tr_err)
}
