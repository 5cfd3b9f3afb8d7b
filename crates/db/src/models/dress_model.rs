//! Dress model (catalogue entry) and DTOs.

use bridal_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use validator::Validate;

/// Largest stock count an admin may set for a single model.
pub const MAX_STOCK_COUNT: i64 = 500;

/// A row from the `dress_models` table.
///
/// `stock_count` is derived from the number of instances attached to the
/// model; it is not stored.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
pub struct DressModel {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub age_bracket: Option<String>,
    pub stock_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a dress model.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDressModel {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[validate(url)]
    pub image_url: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub age_bracket: Option<String>,
    /// Number of physical units to create. Defaults to 0.
    #[validate(range(min = 0, max = MAX_STOCK_COUNT))]
    pub stock_count: Option<i64>,
}

/// DTO for updating a dress model. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDressModel {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i64>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub age_bracket: Option<String>,
    /// New stock count, applied through the instance count adjustment.
    #[validate(range(min = 0, max = MAX_STOCK_COUNT))]
    pub stock_count: Option<i64>,
}

/// Body of `PUT /dress-models/{id}/stock`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdjustStockRequest {
    #[validate(range(min = 0, max = MAX_STOCK_COUNT))]
    pub count: i64,
}

/// Query parameters for `GET /dress-models`.
#[derive(Debug, Deserialize)]
pub struct DressModelListQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
