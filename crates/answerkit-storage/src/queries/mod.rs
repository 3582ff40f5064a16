// SPDX-FileCopyrightText: 2026 Answerkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table group.

pub mod audit;
pub mod chunks;
pub mod plans;
pub mod tokens;

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a timestamp for TEXT column storage (RFC 3339, millisecond, Z).
pub(crate) fn to_ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a TEXT column back into a UTC timestamp.
pub(crate) fn parse_ts(col: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse an optional TEXT column into an optional UTC timestamp.
pub(crate) fn parse_opt_ts(col: usize, s: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    s.map(|s| parse_ts(col, &s)).transpose()
}
