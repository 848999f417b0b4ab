// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort audit logging.
//!
//! Audit writes run on their own task. A failed write is logged at `warn`
//! and otherwise ignored; it never delays or fails the operation that
//! produced the event. Writes may land after the user already got a reply.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::traits::EventLog;
use crate::types::{ErrorReport, LogEvent};

/// Appends `event` to the log without waiting for the write.
///
/// The returned handle is only useful to tests that need the write to land.
pub fn record_in_background(log: Arc<dyn EventLog>, event: LogEvent) -> JoinHandle<()> {
    let at = Utc::now();
    tokio::spawn(async move {
        match log.log_event(&event, at).await {
            Ok(()) => trace!(kind = event.kind(), "event recorded"),
            Err(e) => warn!(kind = event.kind(), error = %e, "dropping audit event"),
        }
    })
}

/// Appends a user problem report without waiting for the write.
pub fn report_in_background(log: Arc<dyn EventLog>, report: ErrorReport) -> JoinHandle<()> {
    let at = Utc::now();
    tokio::spawn(async move {
        match log.record_error_report(&report, at).await {
            Ok(()) => trace!(reporter = report.reporter_id.0, "error report recorded"),
            Err(e) => warn!(reporter = report.reporter_id.0, error = %e, "dropping error report"),
        }
    })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use tokio::sync::Mutex;

    use super::*;
    use crate::error::SauceError;
    use crate::types::{ChatId, MessageId, UserId};

    #[derive(Default)]
    struct RecordingLog {
        events: Mutex<Vec<LogEvent>>,
        reports: Mutex<Vec<ErrorReport>>,
        fail: bool,
    }

    #[async_trait]
    impl EventLog for RecordingLog {
        async fn log_event(&self, event: &LogEvent, _at: DateTime<Utc>) -> Result<(), SauceError> {
            if self.fail {
                return Err(SauceError::Internal("log offline".into()));
            }
            self.events.lock().await.push(event.clone());
            Ok(())
        }

        async fn record_error_report(
            &self,
            report: &ErrorReport,
            _at: DateTime<Utc>,
        ) -> Result<(), SauceError> {
            if self.fail {
                return Err(SauceError::Internal("log offline".into()));
            }
            self.reports.lock().await.push(report.clone());
            Ok(())
        }
    }

    fn photo_event() -> LogEvent {
        LogEvent::PhotoReceived {
            chat_id: ChatId(1),
            message_id: MessageId(2),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn event_lands_in_log() {
        let log = Arc::new(RecordingLog::default());
        record_in_background(log.clone(), photo_event()).await.unwrap();
        assert_eq!(log.events.lock().await.len(), 1);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn failed_write_is_swallowed() {
        let log = Arc::new(RecordingLog {
            fail: true,
            ..Default::default()
        });
        record_in_background(log, photo_event()).await.unwrap();
        assert!(logs_contain("dropping audit event"));
    }

    fn report() -> ErrorReport {
        ErrorReport {
            reporter_id: UserId(4),
            reporter_name: "Rex".into(),
            reporter_username: None,
            description: "button did nothing".into(),
        }
    }

    #[tokio::test]
    async fn report_lands_in_log() {
        let log = Arc::new(RecordingLog::default());
        report_in_background(log.clone(), report()).await.unwrap();
        assert_eq!(log.reports.lock().await[0].description, "button did nothing");
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn failed_report_is_swallowed() {
        let log = Arc::new(RecordingLog {
            fail: true,
            ..Default::default()
        });
        report_in_background(log, report()).await.unwrap();
        assert!(logs_contain("dropping error report"));
    }
}
