use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bridal_core::error::CoreError;
use serde_json::json;

use crate::rental::RentalError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`RentalError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bridal_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A dress instance lifecycle error.
    #[error(transparent)]
    Rental(#[from] RentalError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No instance of the requested model can be held for the given dates.
    #[error("No dress instance available for these dates")]
    NoInstanceAvailable,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal_error()
                }
            },

            // --- Rental lifecycle ---
            AppError::Rental(rental) => classify_rental_error(rental),

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::NoInstanceAvailable => (
                StatusCode::CONFLICT,
                "NO_INSTANCE_AVAILABLE",
                self.to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map lifecycle errors to HTTP. Checkout clients key off `code`:
/// `RESERVATION_EXPIRED` means "re-add to cart", `INVALID_STATE` means
/// "retry from the start".
fn classify_rental_error(err: &RentalError) -> (StatusCode, &'static str, String) {
    match err {
        RentalError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        RentalError::InvalidState { .. } => {
            (StatusCode::CONFLICT, "INVALID_STATE", err.to_string())
        }
        RentalError::ReservationExpired { .. } => {
            (StatusCode::GONE, "RESERVATION_EXPIRED", err.to_string())
        }
        RentalError::InsufficientAvailableInstances { .. } => (
            StatusCode::CONFLICT,
            "INSUFFICIENT_AVAILABLE_INSTANCES",
            err.to_string(),
        ),
        RentalError::InstanceRented { .. } => {
            (StatusCode::CONFLICT, "INSTANCE_RENTED", err.to_string())
        }
        RentalError::NegativeCount(_) | RentalError::InvalidDateRange(_) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
        }
        RentalError::Database(db) => classify_sqlx_error(db),
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}
