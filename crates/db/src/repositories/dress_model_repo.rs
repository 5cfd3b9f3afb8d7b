//! Repository for the `dress_models` table.

use bridal_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::dress_model::{CreateDressModel, DressModel, DressModelListQuery, UpdateDressModel};

/// Column list shared across queries. `stock_count` is computed from the
/// attached instances.
const COLUMNS: &str = "\
    id, name, description, price_cents, image_url, color, size, age_bracket, \
    (SELECT COUNT(*) FROM dress_instances i WHERE i.model_id = dress_models.id) AS stock_count, \
    created_at, updated_at";

/// Maximum page size for model listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for model listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for dress models.
pub struct DressModelRepo;

impl DressModelRepo {
    /// Insert a new model, returning the created row (with no instances yet).
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateDressModel,
    ) -> Result<DressModel, sqlx::Error> {
        let query = format!(
            "INSERT INTO dress_models \
                 (name, description, price_cents, image_url, color, size, age_bracket) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DressModel>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.image_url)
            .bind(&input.color)
            .bind(&input.size)
            .bind(&input.age_bracket)
            .fetch_one(conn)
            .await
    }

    /// Find a model by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DressModel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dress_models WHERE id = $1");
        sqlx::query_as::<_, DressModel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List models ordered by name, with pagination.
    pub async fn list(
        pool: &PgPool,
        params: &DressModelListQuery,
    ) -> Result<Vec<DressModel>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM dress_models ORDER BY name ASC, id ASC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, DressModel>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a model's catalogue fields. Only non-`None` fields are applied;
    /// `stock_count` is ignored here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateDressModel,
    ) -> Result<Option<DressModel>, sqlx::Error> {
        let query = format!(
            "UPDATE dress_models SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                price_cents = COALESCE($4, price_cents), \
                image_url = COALESCE($5, image_url), \
                color = COALESCE($6, color), \
                size = COALESCE($7, size), \
                age_bracket = COALESCE($8, age_bracket) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DressModel>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.image_url)
            .bind(&input.color)
            .bind(&input.size)
            .bind(&input.age_bracket)
            .fetch_optional(conn)
            .await
    }

    /// Take a row lock on the model for the rest of the transaction.
    ///
    /// Serializes concurrent stock adjustments for the same model. Returns
    /// `false` if the model does not exist.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let locked = sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM dress_models WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(locked.is_some())
    }

    /// Delete a model and, via `ON DELETE CASCADE`, all of its instances.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dress_models WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
