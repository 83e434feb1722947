// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::error::ServiceError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses an optional `YYYY-MM-DD` string coming from a client.
///
/// Absent, empty and whitespace-only values mean "no value" and are not an error.
/// Anything else that is not a real calendar date is an `InvalidArgument`.
pub fn parse_date_string(value: Option<&str>) -> Result<Option<NaiveDate>, ServiceError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|e| {
            ServiceError::invalid_argument(format!(
                "invalid date {trimmed:?} (expected YYYY-MM-DD): {e}"
            ))
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Renders a timestamp as `YYYY-MM-DD HH:MM:SS` in the local timezone.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp
        .with_timezone(tz)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
