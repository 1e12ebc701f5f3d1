use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named grouping of sensors, e.g. a greenhouse bay or grow room.
///
/// Zones are managed outside this service; they are only ever read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Zone {
    pub id: i64,
    pub name: String,
}

/// A single temperature/humidity sample taken in a zone.
///
/// The owning zone is not part of the struct: readings are always fetched
/// for one zone at a time, so the caller already knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SensorReading {
    /// Serialized with an explicit `+00:00` offset rather than `Z`.
    #[serde(serialize_with = "crate::time::serialize_rfc3339")]
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
}
