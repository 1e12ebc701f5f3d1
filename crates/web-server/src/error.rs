use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use configuration::ErrorEnvelope;
use core_types::CoreError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(#[from] CoreError),
    /// The request could not be decoded at all (bad path or query string).
    #[error("{0}")]
    InvalidRequest(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
    #[error("{0}")]
    NotFound(String),
}

/// Picks the 5xx status for a database failure.
pub fn database_status(err: &DbError) -> StatusCode {
    if err.is_unavailable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(err) => {
                tracing::debug!(error = %err, "Rejected request.");
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::InvalidRequest(message) => {
                tracing::debug!(error = %message, "Rejected malformed request.");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                let status = database_status(&db_err);
                let message = match db_err {
                    DbError::ConnectionConfigError(msg) => msg,
                    DbError::Timeout(_) => "The database did not respond in time".to_string(),
                    DbError::QueryError(_) => "An internal database error occurred".to_string(),
                };
                (status, message)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// The `{"ok": false, "error": ...}` body used by `/db` and `/zones`.
///
/// Under `ErrorEnvelope::Legacy` it is sent with `200 OK`; under
/// `ErrorEnvelope::Status` with the matching 5xx status.
pub fn failure_envelope(err: DbError, envelope: ErrorEnvelope) -> Response {
    tracing::error!(error = ?err, "Database error.");
    let status = match envelope {
        ErrorEnvelope::Legacy => StatusCode::OK,
        ErrorEnvelope::Status => database_status(&err),
    };
    (status, Json(json!({ "ok": false, "error": err.to_string() }))).into_response()
}
