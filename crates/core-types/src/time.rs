use crate::error::CoreError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::Serializer;

/// A closed time interval `[start, end]`. Construction guarantees `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Fills in missing bounds of a requested window and validates the result.
///
/// A missing `start` becomes `now - default_window`, a missing `end` becomes
/// `now`. `now` is taken from the caller so both defaults come from the same
/// instant.
pub fn resolve_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    default_window: Duration,
) -> Result<TimeRange, CoreError> {
    let start = start.unwrap_or(now - default_window);
    let end = end.unwrap_or(now);
    TimeRange::new(start, end)
}

/// Parses an ISO-8601 timestamp supplied by a client.
///
/// Accepts RFC 3339 with `Z` or a numeric offset, the same with seconds
/// omitted, offset-less values (taken as UTC) and bare dates (midnight UTC).
/// A space where the `+` of the offset should be is tolerated, since an
/// unescaped `+` in a query string decodes to a space.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, CoreError> {
    let raw = value.trim();

    let mut candidates = vec![raw.to_string()];
    if let Some(idx) = raw.rfind(' ') {
        // Only a space after the time portion can be a mangled `+`.
        if idx > 10 && raw.as_bytes().get(10) == Some(&b'T') {
            candidates.push(format!("{}+{}", &raw[..idx], &raw[idx + 1..]));
        }
    }

    for candidate in &candidates {
        if let Some(ts) = parse_with_offset(candidate) {
            return Ok(ts);
        }
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(CoreError::InvalidTimestamp {
        field,
        value: value.to_string(),
    })
}

fn parse_with_offset(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%#z") {
        return Some(ts.with_timezone(&Utc));
    }
    // Zulu without seconds.
    let naive = raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z'))?;
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|ts| ts.and_utc())
}

/// Serializes a UTC timestamp as RFC 3339 with an explicit `+00:00` offset.
pub fn serialize_rfc3339<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, false))
}
