//! Shared utility functions for wxmap crates.

/// Date and time helpers
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

    /// Format used by `<input type="datetime-local">`.
    pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Midnight UTC at the start of `date`.
    pub fn start_of_day(date: &NaiveDate) -> DateTime<Utc> {
        date.and_time(NaiveTime::MIN).and_utc()
    }

    /// Parse RFC 3339, "YYYY-MM-DDTHH:MM" or "YYYY-MM-DD" (midnight), all
    /// read as UTC.
    pub fn parse_datetime(s: &str) -> anyhow::Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, DATETIME_LOCAL_FORMAT) {
            return Ok(naive.and_utc());
        }
        if let Ok(date) = parse_date(s) {
            return Ok(start_of_day(&date));
        }
        Err(DateError(format!("unrecognized date/time '{}'", s)).into())
    }

    /// Value for a datetime-local input.
    pub fn format_datetime_local(dt: &DateTime<Utc>) -> String {
        dt.format(DATETIME_LOCAL_FORMAT).to_string()
    }

    /// Short clock label, e.g. "Mar 5, 02:00 PM".
    pub fn format_clock(dt: &DateTime<Utc>) -> String {
        dt.format("%b %-d, %I:%M %p").to_string()
    }

    /// Day label, e.g. "Tue, Mar 5".
    pub fn format_day(dt: &DateTime<Utc>) -> String {
        dt.format("%a, %b %-d").to_string()
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
