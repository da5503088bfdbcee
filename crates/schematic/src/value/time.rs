//! Point-in-time values: millisecond dates and (seconds, counter) timestamps.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::ValueError;

/// Milliseconds since the Unix epoch, UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date(i64);

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl Date {
    pub const fn from_millis(millis: i64) -> Self {
        Date(millis)
    }

    pub fn now() -> Self {
        Date(Utc::now().timestamp_millis())
    }

    pub const fn millis(&self) -> i64 {
        self.0
    }

    /// Parses an ISO-8601 date or date-time.
    ///
    /// Accepts a `Z` suffix, numeric offsets with or without a colon, a
    /// `GMT+hh:mm` zone, fractional seconds, and a bare `yyyy-MM-dd` date.
    /// Text without any zone is read as UTC.
    pub fn parse_iso(text: &str) -> Result<Self, ValueError> {
        let text = text.trim();
        let normalized = normalize_zone(text);
        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return Ok(Date(dt.timestamp_millis()));
        }
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
                return Ok(Date(dt.timestamp_millis()));
            }
        }
        for format in LOCAL_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
                return Ok(Date(Utc.from_utc_datetime(&naive).timestamp_millis()));
            }
        }
        NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Date(Utc.from_utc_datetime(&naive).timestamp_millis()))
            .ok_or_else(|| ValueError::InvalidDate(text.to_string()))
    }

    /// `yyyy-MM-ddTHH:mm:ss.SSSZ`, or `None` when the year falls outside
    /// 0000..=9999 and cannot be written in that form.
    pub fn to_iso(&self) -> Option<String> {
        let dt = Utc.timestamp_millis_opt(self.0).single()?;
        if !(0..=9999).contains(&dt.year()) {
            return None;
        }
        Some(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
    }
}

fn normalize_zone(text: &str) -> String {
    if let Some(idx) = text.find("GMT") {
        let (head, tail) = text.split_at(idx);
        let zone = &tail[3..];
        return if zone.is_empty() {
            format!("{head}Z")
        } else {
            format!("{head}{zone}")
        };
    }
    if let Some(head) = text.strip_suffix("UTC") {
        return format!("{}Z", head.trim_end());
    }
    text.to_string()
}

impl From<i64> for Date {
    fn from(millis: i64) -> Self {
        Date(millis)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_iso() {
            Some(iso) => f.write_str(&iso),
            None => write!(f, "Date({})", self.0),
        }
    }
}

/// Replication timestamp: seconds since the epoch plus an ordinal counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    time: i32,
    inc: i32,
}

impl Timestamp {
    pub const fn new(time: i32, inc: i32) -> Self {
        Self { time, inc }
    }

    pub const fn time(&self) -> i32 {
        self.time
    }

    pub const fn inc(&self) -> i32 {
        self.inc
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}, {})", self.time, self.inc)
    }
}
