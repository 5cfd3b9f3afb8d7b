//! Repository for the `dress_instances` table.
//!
//! Every method that changes `status_id`, `reserved_at` or the rental dates
//! is a single conditional statement whose `WHERE` clause restates the
//! expected prior state. Callers detect a lost race through `None` (or a
//! zero row count) rather than by re-reading first.

use bridal_core::rental::RentalPeriod;
use bridal_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::dress_instance::{AvailabilitySummary, DressInstance};
use crate::models::status::DressInstanceStatus;

/// Column list for `dress_instances` queries.
const COLUMNS: &str = "\
    id, model_id, label, status_id, reserved_at, rental_start, rental_end, \
    created_at, updated_at";

/// Provides lifecycle queries and conditional writes for dress instances.
pub struct DressInstanceRepo;

impl DressInstanceRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find an instance by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DressInstance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dress_instances WHERE id = $1");
        sqlx::query_as::<_, DressInstance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every instance of a model, oldest first.
    pub async fn list_by_model(
        pool: &PgPool,
        model_id: DbId,
    ) -> Result<Vec<DressInstance>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM dress_instances WHERE model_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, DressInstance>(&query)
            .bind(model_id)
            .fetch_all(pool)
            .await
    }

    /// Lowest-id available instance of `model_id` whose existing rental
    /// window (if any) does not overlap `period`, skipping ids in `exclude`.
    pub async fn find_available(
        pool: &PgPool,
        model_id: DbId,
        period: &RentalPeriod,
        exclude: &[DbId],
    ) -> Result<Option<DressInstance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dress_instances \
             WHERE model_id = $1 \
               AND status_id = $2 \
               AND (rental_start IS NULL \
                    OR NOT (rental_end >= $3 AND rental_start <= $4)) \
               AND NOT (id = ANY($5)) \
             ORDER BY id ASC \
             LIMIT 1"
        );
        sqlx::query_as::<_, DressInstance>(&query)
            .bind(model_id)
            .bind(DressInstanceStatus::Available.id())
            .bind(period.start())
            .bind(period.end())
            .bind(exclude)
            .fetch_optional(pool)
            .await
    }

    /// Count a model's instances by status. Holds stamped before `cutoff`
    /// are counted as available.
    pub async fn availability(
        pool: &PgPool,
        model_id: DbId,
        cutoff: Timestamp,
    ) -> Result<AvailabilitySummary, sqlx::Error> {
        sqlx::query_as::<_, AvailabilitySummary>(
            "SELECT \
                 COUNT(*) AS total, \
                 COUNT(*) FILTER (WHERE status_id = $2 \
                     OR (status_id = $3 AND reserved_at < $6)) AS available, \
                 COUNT(*) FILTER (WHERE status_id = $3 AND reserved_at >= $6) AS reserved, \
                 COUNT(*) FILTER (WHERE status_id = $4) AS rented, \
                 COUNT(*) FILTER (WHERE status_id = $5) AS maintenance \
             FROM dress_instances \
             WHERE model_id = $1",
        )
        .bind(model_id)
        .bind(DressInstanceStatus::Available.id())
        .bind(DressInstanceStatus::Reserved.id())
        .bind(DressInstanceStatus::Rented.id())
        .bind(DressInstanceStatus::Maintenance.id())
        .bind(cutoff)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Conditional lifecycle writes
    // -----------------------------------------------------------------------

    /// `Available -> Reserved`, stamping `reserved_at` and the tentative dates.
    ///
    /// Returns `None` if the instance is no longer available.
    pub async fn try_reserve(
        pool: &PgPool,
        id: DbId,
        period: &RentalPeriod,
        now: Timestamp,
    ) -> Result<Option<DressInstance>, sqlx::Error> {
        let query = format!(
            "UPDATE dress_instances \
             SET status_id = $2, reserved_at = $3, rental_start = $4, rental_end = $5 \
             WHERE id = $1 AND status_id = $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DressInstance>(&query)
            .bind(id)
            .bind(DressInstanceStatus::Reserved.id())
            .bind(now)
            .bind(period.start())
            .bind(period.end())
            .bind(DressInstanceStatus::Available.id())
            .fetch_optional(pool)
            .await
    }

    /// `Reserved -> Rented` for a hold stamped at or after `cutoff`.
    ///
    /// Returns `None` if the instance is missing, not reserved, or its hold
    /// has expired at the moment of the write.
    pub async fn try_confirm(
        pool: &PgPool,
        id: DbId,
        period: &RentalPeriod,
        cutoff: Timestamp,
    ) -> Result<Option<DressInstance>, sqlx::Error> {
        let query = format!(
            "UPDATE dress_instances \
             SET status_id = $2, reserved_at = NULL, rental_start = $3, rental_end = $4 \
             WHERE id = $1 AND status_id = $5 AND reserved_at >= $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DressInstance>(&query)
            .bind(id)
            .bind(DressInstanceStatus::Rented.id())
            .bind(period.start())
            .bind(period.end())
            .bind(DressInstanceStatus::Reserved.id())
            .bind(cutoff)
            .fetch_optional(pool)
            .await
    }

    /// `Reserved -> Available`, clearing the hold and tentative dates.
    ///
    /// Returns `None` if the instance is missing or not reserved.
    pub async fn try_release(pool: &PgPool, id: DbId) -> Result<Option<DressInstance>, sqlx::Error> {
        let query = format!(
            "UPDATE dress_instances \
             SET status_id = $2, reserved_at = NULL, rental_start = NULL, rental_end = NULL \
             WHERE id = $1 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DressInstance>(&query)
            .bind(id)
            .bind(DressInstanceStatus::Available.id())
            .bind(DressInstanceStatus::Reserved.id())
            .fetch_optional(pool)
            .await
    }

    /// `Reserved -> Available` only for a hold stamped before `cutoff`.
    ///
    /// Returns `None` if the instance is missing, not reserved, or its hold
    /// is still live.
    pub async fn try_release_expired(
        pool: &PgPool,
        id: DbId,
        cutoff: Timestamp,
    ) -> Result<Option<DressInstance>, sqlx::Error> {
        let query = format!(
            "UPDATE dress_instances \
             SET status_id = $2, reserved_at = NULL, rental_start = NULL, rental_end = NULL \
             WHERE id = $1 AND status_id = $3 AND reserved_at < $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DressInstance>(&query)
            .bind(id)
            .bind(DressInstanceStatus::Available.id())
            .bind(DressInstanceStatus::Reserved.id())
            .bind(cutoff)
            .fetch_optional(pool)
            .await
    }

    /// Release every hold stamped before `cutoff` in one statement.
    ///
    /// Returns the number of instances released.
    pub async fn release_expired(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        Self::release_expired_where(pool, None, cutoff).await
    }

    /// Same as [`release_expired`](Self::release_expired), scoped to one model.
    pub async fn release_expired_for_model(
        pool: &PgPool,
        model_id: DbId,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        Self::release_expired_where(pool, Some(model_id), cutoff).await
    }

    /// Model-scoped release on an open transaction, so the caller's later
    /// reads under the same locks see the freed rows as available.
    pub async fn release_expired_for_model_in(
        conn: &mut PgConnection,
        model_id: DbId,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        Self::release_expired_where(conn, Some(model_id), cutoff).await
    }

    async fn release_expired_where<'e, E>(
        executor: E,
        model_id: Option<DbId>,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE dress_instances \
             SET status_id = $1, reserved_at = NULL, rental_start = NULL, rental_end = NULL \
             WHERE status_id = $2 \
               AND reserved_at < $3 \
               AND ($4::BIGINT IS NULL OR model_id = $4)",
        )
        .bind(DressInstanceStatus::Available.id())
        .bind(DressInstanceStatus::Reserved.id())
        .bind(cutoff)
        .bind(model_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Move an instance from `from` to `to`, clearing the hold and rental
    /// dates. Used for maintenance and returns, whose targets carry no data.
    ///
    /// Returns `None` if the instance is missing or not in `from`.
    pub async fn try_transition(
        pool: &PgPool,
        id: DbId,
        from: DressInstanceStatus,
        to: DressInstanceStatus,
    ) -> Result<Option<DressInstance>, sqlx::Error> {
        let query = format!(
            "UPDATE dress_instances \
             SET status_id = $3, reserved_at = NULL, rental_start = NULL, rental_end = NULL \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DressInstance>(&query)
            .bind(id)
            .bind(from.id())
            .bind(to.id())
            .fetch_optional(pool)
            .await
    }

    /// Delete an instance unless it is rented. Returns `true` if a row was
    /// removed.
    pub async fn delete_unless_rented(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM dress_instances WHERE id = $1 AND status_id <> $2")
            .bind(id)
            .bind(DressInstanceStatus::Rented.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Stock adjustment (run inside a transaction holding the model lock)
    // -----------------------------------------------------------------------

    /// Number of instances currently attached to a model.
    pub async fn count_for_model(conn: &mut PgConnection, model_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM dress_instances WHERE model_id = $1")
            .bind(model_id)
            .fetch_one(conn)
            .await
    }

    /// Labels of every instance attached to a model.
    pub async fn labels_for_model(
        conn: &mut PgConnection,
        model_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT label FROM dress_instances WHERE model_id = $1")
            .bind(model_id)
            .fetch_all(conn)
            .await
    }

    /// Insert one available instance per label. Returns the number inserted.
    pub async fn insert_available(
        conn: &mut PgConnection,
        model_id: DbId,
        labels: &[String],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO dress_instances (model_id, label, status_id) \
             SELECT $1, label, $3 FROM UNNEST($2::TEXT[]) AS label",
        )
        .bind(model_id)
        .bind(labels)
        .bind(DressInstanceStatus::Available.id())
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Lock every available instance of a model, newest first.
    ///
    /// Rows reserved or rented concurrently drop out of the result once the
    /// lock is acquired, so the returned ids stay available until commit.
    pub async fn lock_available_newest_first(
        conn: &mut PgConnection,
        model_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM dress_instances \
             WHERE model_id = $1 AND status_id = $2 \
             ORDER BY id DESC \
             FOR UPDATE",
        )
        .bind(model_id)
        .bind(DressInstanceStatus::Available.id())
        .fetch_all(conn)
        .await
    }

    /// Delete the given instances if they are still available. Returns the
    /// number removed.
    pub async fn delete_available(conn: &mut PgConnection, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM dress_instances WHERE id = ANY($1) AND status_id = $2")
                .bind(ids)
                .bind(DressInstanceStatus::Available.id())
                .execute(conn)
                .await?;
        Ok(result.rows_affected())
    }
}
