use crate::{AppState, error::AppError, error::failure_envelope};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use core_types::{CoreError, SensorReading, parse_timestamp, resolve_window};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Optional bounds for `/readings/:zone_id`. Kept as raw strings so parse
/// failures produce our own 400 message.
#[derive(Debug, Default, Deserialize)]
pub struct ReadingsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// # GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// # GET /db
/// Asks the database for its clock. Failures are reported in the body.
pub async fn db_check(State(state): State<Arc<AppState>>) -> Response {
    match state.repo.database_time().await {
        Ok(now) => Json(json!({
            "ok": true,
            "now": now.to_rfc3339_opts(SecondsFormat::AutoSi, false),
        }))
        .into_response(),
        Err(err) => failure_envelope(err, state.error_envelope),
    }
}

/// # GET /zones
pub async fn list_zones(State(state): State<Arc<AppState>>) -> Response {
    match state.repo.list_zones().await {
        Ok(zones) => Json(zones).into_response(),
        Err(err) => failure_envelope(err, state.error_envelope),
    }
}

/// # GET /readings/:zone_id
/// Readings for one zone within `[start, end]`, oldest first.
///
/// Missing bounds default to the trailing window ending now. The range is
/// validated before the zone lookup, so an inverted range is a 400 even for
/// unknown zones.
pub async fn get_readings(
    zone_id: Result<Path<String>, PathRejection>,
    query: Result<Query<ReadingsQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SensorReading>>, AppError> {
    let Path(zone_id) = zone_id.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let Query(query) = query.map_err(|e| AppError::InvalidRequest(e.body_text()))?;

    let zone_id: i64 = zone_id
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidZoneId(zone_id.clone()))?;
    let start = parse_bound("start", query.start.as_deref())?;
    let end = parse_bound("end", query.end.as_deref())?;

    let now = Utc::now();
    let range = resolve_window(start, end, now, state.default_window)?;

    if !state.repo.zone_exists(zone_id).await? {
        return Err(AppError::NotFound(format!("Zone {} not found", zone_id)));
    }

    let readings = state.repo.fetch_readings(zone_id, &range).await?;
    Ok(Json(readings))
}

/// An empty value (`?start=`) is treated the same as an absent one.
fn parse_bound(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<chrono::DateTime<Utc>>, CoreError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => parse_timestamp(field, raw).map(Some),
        None => Ok(None),
    }
}
