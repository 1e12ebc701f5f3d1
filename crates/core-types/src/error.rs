use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid zone id '{0}': expected an integer")]
    InvalidZoneId(String),

    #[error("Invalid `{field}` timestamp '{value}': expected ISO-8601, e.g. 2024-01-01T00:00:00Z")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("Invalid time range: start ({}) is after end ({})", rfc3339(.start), rfc3339(.end))]
    InvertedRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
