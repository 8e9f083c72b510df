//! Timestamp formatting utilities
//!
//! Renders the `[<timestamp>] ` prefix written in front of messages when
//! timestamping is enabled on a handler.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Timestamp layout used for the message prefix
///
/// # Examples
///
/// ```
/// use rust_console_logger::core::TimestampFormat;
/// use chrono::{Local, TimeZone};
///
/// let at = Local.with_ymd_and_hms(2026, 10, 19, 9, 5, 3).unwrap();
/// assert_eq!(TimestampFormat::Asctime.format(&at), "Mon Oct 19 09:05:03 2026");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// C `asctime()` layout: `Mon Oct 19 09:05:03 2026`
    ///
    /// The day of month is padded with a space, not a zero.
    #[default]
    Asctime,

    /// ISO 8601 with milliseconds and offset: `2026-10-19T09:05:03.123+02:00`
    Iso8601,

    /// RFC 3339: `2026-10-19T09:05:03.123456789+02:00`
    Rfc3339,

    /// Custom strftime format
    ///
    /// An invalid format string makes rendering fail; the handler reports
    /// that as a formatting error instead of panicking.
    Custom(String),
}

impl TimestampFormat {
    const ASCTIME: &'static str = "%a %b %e %H:%M:%S %Y";
    const ISO8601: &'static str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

    /// Append the rendered timestamp to `out`
    pub fn write_to<Tz>(&self, out: &mut String, datetime: &DateTime<Tz>) -> fmt::Result
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::Asctime => write!(out, "{}", datetime.format(Self::ASCTIME)),
            TimestampFormat::Iso8601 => write!(out, "{}", datetime.format(Self::ISO8601)),
            TimestampFormat::Rfc3339 => out.write_str(&datetime.to_rfc3339()),
            TimestampFormat::Custom(format_str) => write!(out, "{}", datetime.format(format_str)),
        }
    }

    /// Render a timestamp, falling back to an empty string if the format is invalid
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::new();
        if self.write_to(&mut out, datetime).is_err() {
            out.clear();
        }
        out
    }
}
