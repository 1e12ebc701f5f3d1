use crate::DbError;
use crate::connection::ConnectionProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{SensorReading, TimeRange, Zone};

/// The read operations the HTTP layer needs from storage.
///
/// This trait keeps the handlers agnostic about whether they talk to
/// PostgreSQL or to an in-memory stand-in.
#[async_trait]
pub trait SensorRepository: Send + Sync {
    /// Returns the database server's current time. Used as a liveness probe.
    async fn database_time(&self) -> Result<DateTime<Utc>, DbError>;

    /// `true` iff a zone with this id exists. Absence is not an error.
    async fn zone_exists(&self, zone_id: i64) -> Result<bool, DbError>;

    /// All zones, sorted by name ascending.
    async fn list_zones(&self) -> Result<Vec<Zone>, DbError>;

    /// Readings for `zone_id` with `range.start() <= timestamp <= range.end()`,
    /// oldest first. Does not check that the zone exists.
    async fn fetch_readings(
        &self,
        zone_id: i64,
        range: &TimeRange,
    ) -> Result<Vec<SensorReading>, DbError>;
}

/// The `DbRepository` provides the PostgreSQL-backed `SensorRepository`.
/// It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    provider: ConnectionProvider,
}

impl DbRepository {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl SensorRepository for DbRepository {
    async fn database_time(&self) -> Result<DateTime<Utc>, DbError> {
        self.provider
            .with_deadline(async {
                let mut conn = self.provider.acquire().await?;
                let now: DateTime<Utc> = sqlx::query_scalar("SELECT now()")
                    .fetch_one(&mut *conn)
                    .await?;
                Ok::<_, DbError>(now)
            })
            .await
    }

    async fn zone_exists(&self, zone_id: i64) -> Result<bool, DbError> {
        self.provider
            .with_deadline(async {
                let mut conn = self.provider.acquire().await?;
                let row: Option<i32> =
                    sqlx::query_scalar("SELECT 1 FROM zones WHERE id = $1 LIMIT 1")
                        .bind(zone_id)
                        .fetch_optional(&mut *conn)
                        .await?;
                Ok::<_, DbError>(row.is_some())
            })
            .await
    }

    async fn list_zones(&self) -> Result<Vec<Zone>, DbError> {
        self.provider
            .with_deadline(async {
                let mut conn = self.provider.acquire().await?;
                // `id` is widened so SERIAL and BIGSERIAL schemas both decode into i64.
                let zones = sqlx::query_as::<_, Zone>(
                    "SELECT id::int8 AS id, name FROM zones ORDER BY name ASC, id ASC",
                )
                .fetch_all(&mut *conn)
                .await?;
                Ok::<_, DbError>(zones)
            })
            .await
    }

    async fn fetch_readings(
        &self,
        zone_id: i64,
        range: &TimeRange,
    ) -> Result<Vec<SensorReading>, DbError> {
        self.provider
            .with_deadline(async {
                let mut conn = self.provider.acquire().await?;
                let readings = sqlx::query_as::<_, SensorReading>(
                    r#"
                    SELECT "timestamp",
                           temperature::float8 AS temperature,
                           humidity::float8 AS humidity
                    FROM sensor_readings
                    WHERE zone_id = $1 AND "timestamp" >= $2 AND "timestamp" <= $3
                    ORDER BY "timestamp" ASC
                    "#,
                )
                .bind(zone_id)
                .bind(range.start())
                .bind(range.end())
                .fetch_all(&mut *conn)
                .await?;

                tracing::debug!(zone_id, count = readings.len(), "Fetched sensor readings.");
                Ok::<_, DbError>(readings)
            })
            .await
    }
}
