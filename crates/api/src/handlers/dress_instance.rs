//! Handlers for the `/dress-instances` resource.
//!
//! Thin wrappers over [`RentalInstanceManager`](crate::rental::RentalInstanceManager).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bridal_core::types::DbId;
use bridal_db::models::dress_instance::{RentalDatesRequest, ReturnInstanceRequest};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response payload for the on-demand sweep.
#[derive(Debug, Serialize)]
pub struct SweepResult {
    pub released: u64,
}

/// GET /api/v1/dress-instances/{id}
pub async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let instance = state.rentals.get_instance(id).await?;
    Ok(Json(DataResponse { data: instance }))
}

/// DELETE /api/v1/dress-instances/{id}
///
/// Returns 204, or 409 `INSTANCE_RENTED`.
pub async fn delete_instance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.rentals.delete_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/dress-instances/{id}/release
///
/// Always 200. `data` is the instance as it now stands, or `null` if it
/// does not exist.
pub async fn release(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let instance = state.rentals.release(id).await?;
    Ok(Json(DataResponse { data: instance }))
}

/// POST /api/v1/dress-instances/{id}/confirm
///
/// Called by order finalization once payment or cash-on-delivery is
/// committed.
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RentalDatesRequest>,
) -> AppResult<impl IntoResponse> {
    let instance = state
        .rentals
        .confirm_and_rent(id, input.start_date, input.end_date)
        .await?;
    Ok(Json(DataResponse { data: instance }))
}

/// POST /api/v1/dress-instances/{id}/return
///
/// The body is optional; without one the dress goes straight back to stock.
pub async fn return_instance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    input: Option<Json<ReturnInstanceRequest>>,
) -> AppResult<impl IntoResponse> {
    let needs_maintenance = input.is_some_and(|Json(body)| body.needs_maintenance);
    let instance = state.rentals.return_instance(id, needs_maintenance).await?;
    Ok(Json(DataResponse { data: instance }))
}

/// POST /api/v1/dress-instances/{id}/maintenance
pub async fn start_maintenance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let instance = state.rentals.start_maintenance(id).await?;
    Ok(Json(DataResponse { data: instance }))
}

/// DELETE /api/v1/dress-instances/{id}/maintenance
pub async fn end_maintenance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let instance = state.rentals.end_maintenance(id).await?;
    Ok(Json(DataResponse { data: instance }))
}

/// POST /api/v1/dress-instances/check-expired
///
/// On-demand run of the expired-reservation sweep.
pub async fn check_expired(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let released = state.rentals.check_and_release_expired_reservations().await?;
    Ok(Json(DataResponse {
        data: SweepResult { released },
    }))
}
