// SPDX-FileCopyrightText: 2026 Saucebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed statements, one module per table group.

pub mod credentials;
pub mod events;

use chrono::{DateTime, SecondsFormat, Utc};

/// Timestamp format shared by every table.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
