//! Timestamp formatting utilities
//!
//! Timestamps are rendered in local time. Besides a few fixed layouts any
//! strftime-compatible pattern can be used.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp layout options
///
/// # Examples
///
/// ```
/// use nested_logger::TimestampFormat;
/// use chrono::{Local, TimeZone};
///
/// let t = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
/// assert_eq!(TimestampFormat::StampMilli.format(&t).unwrap(), "Mar  5 14:07:09.000");
/// assert_eq!(TimestampFormat::DateTime.format(&t).unwrap(), "2024-03-05 14:07:09");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Month, space-padded day and time with milliseconds: `Jan  8 10:30:45.123`
    #[default]
    StampMilli,

    /// Date and time to the second: `2025-01-08 10:30:45`
    DateTime,

    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+01:00`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+01:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use nested_logger::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Reject custom patterns chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(pattern) = self {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "timestamp_format",
                    format!("invalid strftime pattern '{}'", pattern),
                ));
            }
        }
        Ok(())
    }

    /// Format a timestamp according to this layout.
    ///
    /// Fails only for a custom pattern that does not pass
    /// [`TimestampFormat::validate`].
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> Result<String>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let pattern = match self {
            TimestampFormat::StampMilli => "%b %e %H:%M:%S%.3f",
            TimestampFormat::DateTime => "%Y-%m-%d %H:%M:%S",
            TimestampFormat::Iso8601 => "%Y-%m-%dT%H:%M:%S%.3f%:z",
            TimestampFormat::Rfc3339 => return Ok(datetime.to_rfc3339()),
            TimestampFormat::UnixMillis => return Ok(datetime.timestamp_millis().to_string()),
            TimestampFormat::Custom(pattern) => pattern.as_str(),
        };

        let mut out = String::with_capacity(32);
        write!(out, "{}", datetime.format(pattern)).map_err(|_| {
            LoggerError::formatter("timestamp", format!("cannot render pattern '{}'", pattern))
        })?;
        Ok(out)
    }

    /// Check if this is a numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}
