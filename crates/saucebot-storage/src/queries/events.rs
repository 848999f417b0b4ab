// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit tables: chat events, search log, error reports.

use chrono::{DateTime, Utc};
use rusqlite::params;
use saucebot_core::SauceError;
use saucebot_core::types::{ErrorReport, LogEvent};

use crate::database::{Database, map_tr_err};
use crate::queries::timestamp;

/// A row read back from `chat_events`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEvent {
    pub id: i64,
    pub kind: String,
    pub user_id: Option<i64>,
    pub payload: serde_json::Value,
    pub created_at: String,
}

/// Appends an event. Search results land in `search_log`, the rest in `chat_events`.
pub async fn append_event(
    db: &Database,
    event: &LogEvent,
    at: DateTime<Utc>,
) -> Result<(), SauceError> {
    let created_at = timestamp(at);
    let user_id = event.user_id().map(|u| u.0);

    if let LogEvent::Search { results, .. } = event {
        let count = results.len() as i64;
        let results = serde_json::to_string(results).map_err(|e| SauceError::Storage {
            source: Box::new(e),
        })?;
        return db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO search_log (user_id, result_count, results, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![user_id, count, results, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);
    }

    let kind = event.kind();
    let payload = serde_json::to_string(event).map_err(|e| SauceError::Storage {
        source: Box::new(e),
    })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO chat_events (kind, user_id, payload, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![kind, user_id, payload, created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn append_error_report(
    db: &Database,
    report: &ErrorReport,
    at: DateTime<Utc>,
) -> Result<(), SauceError> {
    let report = report.clone();
    let created_at = timestamp(at);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO error_reports
                     (reporter_id, reporter_name, reporter_username, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    report.reporter_id.0,
                    report.reporter_name,
                    report.reporter_username,
                    report.description,
                    created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent chat events, newest first.
pub async fn recent_events(db: &Database, limit: i64) -> Result<Vec<StoredEvent>, SauceError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, kind, user_id, payload, created_at FROM chat_events
                 ORDER BY id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                let payload: String = row.get(3)?;
                Ok(StoredEvent {
                    id: row.get(0)?,
                    kind: row.get(1)?,
                    user_id: row.get(2)?,
                    payload: serde_json::from_str(&payload).unwrap_or(serde_json::Value::Null),
                    created_at: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Number of search-log rows recorded for a user.
pub async fn search_count(db: &Database, user_id: Option<i64>) -> Result<i64, SauceError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM search_log WHERE user_id IS ?1",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use saucebot_core::types::{ChatId, MessageId, SearchMatch, Site, UserId};
    use tempfile::{TempDir, tempdir};

    async fn open() -> (TempDir, Database) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.db");
        let db = Database::open(path.to_str().unwrap(), false).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn chat_events_keep_kind_and_payload() {
        let (_dir, db) = open().await;
        let event = LogEvent::CommandReceived {
            chat_id: ChatId(1),
            user_id: UserId(2),
            command: "start".into(),
        };
        append_event(&db, &event, Utc::now()).await.unwrap();

        let rows = recent_events(&db, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "command_received");
        assert_eq!(rows[0].user_id, Some(2));
        assert_eq!(rows[0].payload["command"], "start");
    }

    #[tokio::test]
    async fn anonymous_photo_has_null_user() {
        let (_dir, db) = open().await;
        let event = LogEvent::PhotoReceived {
            chat_id: ChatId(-100),
            message_id: MessageId(5),
            user_id: None,
        };
        append_event(&db, &event, Utc::now()).await.unwrap();
        let rows = recent_events(&db, 1).await.unwrap();
        assert_eq!(rows[0].user_id, None);
    }

    #[tokio::test]
    async fn searches_go_to_search_log() {
        let (_dir, db) = open().await;
        let event = LogEvent::Search {
            user_id: Some(UserId(3)),
            results: vec![SearchMatch::new(Site::E621, "123", Some(0))],
        };
        append_event(&db, &event, Utc::now()).await.unwrap();

        assert_eq!(search_count(&db, Some(3)).await.unwrap(), 1);
        assert!(recent_events(&db, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_reports_are_appended() {
        let (_dir, db) = open().await;
        let report = ErrorReport {
            reporter_id: UserId(4),
            reporter_name: "Ana".into(),
            reporter_username: None,
            description: "button did nothing".into(),
        };
        append_error_report(&db, &report, Utc::now()).await.unwrap();
        append_error_report(&db, &report, Utc::now()).await.unwrap();

        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM error_reports", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
