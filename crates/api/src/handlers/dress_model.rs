//! Handlers for the `/dress-models` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bridal_core::error::CoreError;
use bridal_core::types::DbId;
use bridal_db::models::dress_instance::RentalDatesRequest;
use bridal_db::models::dress_model::{
    AdjustStockRequest, CreateDressModel, DressModel, DressModelListQuery, UpdateDressModel,
};
use bridal_db::repositories::DressModelRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_model(pool: &sqlx::PgPool, id: DbId) -> AppResult<DressModel> {
    DressModelRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DressModel",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Catalogue CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/dress-models
///
/// Create a model and its initial `stock_count` instances in one
/// transaction. Returns 201 with the created model.
pub async fn create_model(
    State(state): State<AppState>,
    Json(input): Json<CreateDressModel>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    let model = DressModelRepo::create(&mut tx, &input).await?;
    let stock = input.stock_count.unwrap_or(0);
    if stock > 0 {
        state
            .rentals
            .apply_instance_count(&mut tx, model.id, stock)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(model_id = model.id, name = %model.name, stock, "Dress model created");

    let model = find_model(&state.pool, model.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: model })))
}

/// GET /api/v1/dress-models
pub async fn list_models(
    State(state): State<AppState>,
    Query(params): Query<DressModelListQuery>,
) -> AppResult<impl IntoResponse> {
    let models = DressModelRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: models }))
}

/// GET /api/v1/dress-models/{id}
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let model = find_model(&state.pool, id).await?;
    Ok(Json(DataResponse { data: model }))
}

/// PUT /api/v1/dress-models/{id}
///
/// Partial update. A `stock_count` in the body is applied through the
/// instance count adjustment in the same transaction, so a refused
/// decrease leaves the catalogue fields untouched as well.
pub async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDressModel>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let mut tx = state.pool.begin().await?;
    DressModelRepo::update(&mut tx, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "DressModel",
            id,
        }))?;
    if let Some(count) = input.stock_count {
        state.rentals.apply_instance_count(&mut tx, id, count).await?;
    }
    tx.commit().await?;

    tracing::info!(model_id = id, "Dress model updated");

    let model = find_model(&state.pool, id).await?;
    Ok(Json(DataResponse { data: model }))
}

/// DELETE /api/v1/dress-models/{id}
///
/// Deletes the model and all of its instances. Returns 204.
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !DressModelRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "DressModel",
            id,
        }));
    }
    tracing::info!(model_id = id, "Dress model deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Stock and availability
// ---------------------------------------------------------------------------

/// PUT /api/v1/dress-models/{id}/stock
///
/// Set the number of physical units. Returns the resulting instances, or
/// 409 `INSUFFICIENT_AVAILABLE_INSTANCES` when shrinking would touch a
/// reserved or rented unit.
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdjustStockRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let instances = state.rentals.adjust_instance_count(id, input.count).await?;
    Ok(Json(DataResponse { data: instances }))
}

/// GET /api/v1/dress-models/{id}/instances
pub async fn list_instances(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let instances = state.rentals.list_instances(id).await?;
    Ok(Json(DataResponse { data: instances }))
}

/// GET /api/v1/dress-models/{id}/availability
pub async fn availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = state.rentals.availability_summary(id).await?;
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

/// POST /api/v1/dress-models/{id}/reserve
///
/// Hold one unit for the given dates. Returns 201 with the reserved
/// instance, 404 for an unknown model, or 409 `NO_INSTANCE_AVAILABLE`.
pub async fn reserve(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RentalDatesRequest>,
) -> AppResult<impl IntoResponse> {
    let reserved = state
        .rentals
        .reserve(id, input.start_date, input.end_date)
        .await?
        .ok_or(AppError::NoInstanceAvailable)?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: reserved })))
}
