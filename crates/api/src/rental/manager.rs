//! The rental instance manager.
//!
//! Each operation issues one conditional write through [`DressInstanceRepo`]
//! and only reads back afterwards, to explain a write that matched nothing.
//! The store evaluates every status and deadline predicate at write time, so
//! concurrent request workers and the background sweep can run these
//! operations against the same rows without extra locking.

use std::cmp::Ordering;

use bridal_core::rental::labels::{format_label, next_label_numbers};
use bridal_core::rental::{InstanceState, InstanceStatus, RentalPeriod, ReservationWindow};
use bridal_core::types::{DbId, RentalDate, Timestamp};
use bridal_db::models::dress_instance::{AvailabilitySummary, DressInstance};
use bridal_db::models::status::DressInstanceStatus;
use bridal_db::repositories::{DressInstanceRepo, DressModelRepo};
use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use super::{RentalError, RentalResult};

/// Upper bound on candidates tried by one `reserve` call before reporting
/// that nothing is available.
const MAX_RESERVE_ATTEMPTS: usize = 32;

/// Upper bound on delete attempts when the instance keeps changing status
/// underneath us.
const MAX_DELETE_ATTEMPTS: usize = 3;

const INSTANCE: &str = "DressInstance";
const MODEL: &str = "DressModel";

/// Owns the lifecycle of physical dress units.
///
/// Cheap to clone; holds a pool handle and the reservation window.
#[derive(Debug, Clone)]
pub struct RentalInstanceManager {
    pool: PgPool,
    window: ReservationWindow,
}

impl RentalInstanceManager {
    pub fn new(pool: PgPool, window: ReservationWindow) -> Self {
        Self { pool, window }
    }

    pub fn window(&self) -> ReservationWindow {
        self.window
    }

    fn now() -> Timestamp {
        Utc::now()
    }

    fn period(start: RentalDate, end: RentalDate) -> RentalResult<RentalPeriod> {
        RentalPeriod::new(start, end).map_err(|e| RentalError::InvalidDateRange(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub async fn get_instance(&self, id: DbId) -> RentalResult<DressInstance> {
        DressInstanceRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(RentalError::NotFound { entity: INSTANCE, id })
    }

    pub async fn list_instances(&self, model_id: DbId) -> RentalResult<Vec<DressInstance>> {
        self.ensure_model(model_id).await?;
        Ok(DressInstanceRepo::list_by_model(&self.pool, model_id).await?)
    }

    /// Per-status counts for a model, with expired holds counted as available.
    pub async fn availability_summary(&self, model_id: DbId) -> RentalResult<AvailabilitySummary> {
        self.ensure_model(model_id).await?;
        let cutoff = self.window.cutoff(Self::now());
        Ok(DressInstanceRepo::availability(&self.pool, model_id, cutoff).await?)
    }

    /// Lowest-id available instance of `model_id` free for `[start, end]`.
    pub async fn find_available_instance(
        &self,
        model_id: DbId,
        start: RentalDate,
        end: RentalDate,
    ) -> RentalResult<Option<DressInstance>> {
        let period = Self::period(start, end)?;
        Ok(DressInstanceRepo::find_available(&self.pool, model_id, &period, &[]).await?)
    }

    async fn ensure_model(&self, model_id: DbId) -> RentalResult<()> {
        match DressModelRepo::find_by_id(&self.pool, model_id).await? {
            Some(_) => Ok(()),
            None => Err(RentalError::NotFound {
                entity: MODEL,
                id: model_id,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Checkout lifecycle
    // -----------------------------------------------------------------------

    /// Place a soft hold on one available instance of `model_id`.
    ///
    /// Expired holds on the model are released first so they count as
    /// available. Losing the conditional write to a concurrent caller moves
    /// on to the next candidate; `None` means nothing is available. An
    /// unknown model is `NotFound`.
    pub async fn reserve(
        &self,
        model_id: DbId,
        start: RentalDate,
        end: RentalDate,
    ) -> RentalResult<Option<DressInstance>> {
        let period = Self::period(start, end)?;
        self.ensure_model(model_id).await?;
        let now = Self::now();

        let reclaimed =
            DressInstanceRepo::release_expired_for_model(&self.pool, model_id, self.window.cutoff(now))
                .await?;
        if reclaimed > 0 {
            tracing::info!(model_id, reclaimed, "Released expired holds before reserving");
        }

        let mut tried: Vec<DbId> = Vec::new();
        while tried.len() < MAX_RESERVE_ATTEMPTS {
            let Some(candidate) =
                DressInstanceRepo::find_available(&self.pool, model_id, &period, &tried).await?
            else {
                break;
            };

            match DressInstanceRepo::try_reserve(&self.pool, candidate.id, &period, now).await? {
                Some(reserved) => {
                    tracing::info!(
                        instance_id = reserved.id,
                        model_id,
                        %start,
                        %end,
                        "Dress instance reserved",
                    );
                    return Ok(Some(reserved));
                }
                None => {
                    tracing::warn!(
                        instance_id = candidate.id,
                        model_id,
                        "Lost reservation race, trying next candidate",
                    );
                    tried.push(candidate.id);
                }
            }
        }

        tracing::info!(model_id, %start, %end, "No dress instance available");
        Ok(None)
    }

    /// Drop a soft hold. A missing or non-reserved instance is returned
    /// unchanged, so calling this twice is harmless.
    pub async fn release(&self, id: DbId) -> RentalResult<Option<DressInstance>> {
        if let Some(released) = DressInstanceRepo::try_release(&self.pool, id).await? {
            tracing::info!(instance_id = id, "Dress instance released");
            return Ok(Some(released));
        }

        tracing::debug!(instance_id = id, "Release was a no-op");
        Ok(DressInstanceRepo::find_by_id(&self.pool, id).await?)
    }

    /// Turn a live hold into a confirmed rental for `[start, end]`.
    ///
    /// Must only be called once the order is committed. An expired hold is
    /// released on the way out and reported as `ReservationExpired`.
    pub async fn confirm_and_rent(
        &self,
        id: DbId,
        start: RentalDate,
        end: RentalDate,
    ) -> RentalResult<DressInstance> {
        let period = Self::period(start, end)?;
        let now = Self::now();
        let cutoff = self.window.cutoff(now);

        if let Some(rented) = DressInstanceRepo::try_confirm(&self.pool, id, &period, cutoff).await? {
            tracing::info!(
                instance_id = id,
                model_id = rented.model_id,
                %start,
                %end,
                "Dress instance rented",
            );
            return Ok(rented);
        }

        let current = DressInstanceRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(RentalError::NotFound { entity: INSTANCE, id })?;

        match current.state {
            InstanceState::Reserved { reserved_at, .. } if self.window.is_expired(reserved_at, now) => {
                DressInstanceRepo::try_release_expired(&self.pool, id, cutoff).await?;
                tracing::warn!(
                    instance_id = id,
                    %reserved_at,
                    "Confirmation arrived after the hold expired",
                );
                Err(RentalError::ReservationExpired { id })
            }
            state => Err(RentalError::InvalidState {
                id,
                status: state.status(),
                action: "confirm a reservation",
            }),
        }
    }

    /// Release every hold older than the window in one conditional bulk
    /// write. Returns how many were released.
    pub async fn check_and_release_expired_reservations(&self) -> RentalResult<u64> {
        let cutoff = self.window.cutoff(Self::now());
        let released = DressInstanceRepo::release_expired(&self.pool, cutoff).await?;

        if released > 0 {
            tracing::info!(released, %cutoff, "Released expired reservations");
        } else {
            tracing::debug!("No expired reservations to release");
        }
        Ok(released)
    }

    // -----------------------------------------------------------------------
    // Maintenance and returns
    // -----------------------------------------------------------------------

    pub async fn start_maintenance(&self, id: DbId) -> RentalResult<DressInstance> {
        self.transition(
            id,
            DressInstanceStatus::Available,
            DressInstanceStatus::Maintenance,
            "start maintenance",
        )
        .await
    }

    pub async fn end_maintenance(&self, id: DbId) -> RentalResult<DressInstance> {
        self.transition(
            id,
            DressInstanceStatus::Maintenance,
            DressInstanceStatus::Available,
            "end maintenance",
        )
        .await
    }

    /// Take back a rented dress, either into stock or into maintenance.
    pub async fn return_instance(
        &self,
        id: DbId,
        needs_maintenance: bool,
    ) -> RentalResult<DressInstance> {
        let target = if needs_maintenance {
            DressInstanceStatus::Maintenance
        } else {
            DressInstanceStatus::Available
        };
        self.transition(id, DressInstanceStatus::Rented, target, "return")
            .await
    }

    async fn transition(
        &self,
        id: DbId,
        from: DressInstanceStatus,
        to: DressInstanceStatus,
        action: &'static str,
    ) -> RentalResult<DressInstance> {
        if let Some(moved) = DressInstanceRepo::try_transition(&self.pool, id, from, to).await? {
            tracing::info!(
                instance_id = id,
                from = %InstanceStatus::from(from),
                to = %InstanceStatus::from(to),
                "Dress instance status changed",
            );
            return Ok(moved);
        }

        let current = self.get_instance(id).await?;
        Err(RentalError::InvalidState {
            id,
            status: current.status(),
            action,
        })
    }

    // -----------------------------------------------------------------------
    // Stock management
    // -----------------------------------------------------------------------

    /// Grow or shrink a model's pool of instances to `new_count`.
    ///
    /// Returns the model's instances after the change, oldest first.
    pub async fn adjust_instance_count(
        &self,
        model_id: DbId,
        new_count: i64,
    ) -> RentalResult<Vec<DressInstance>> {
        let mut tx = self.pool.begin().await?;
        self.apply_instance_count(&mut tx, model_id, new_count).await?;
        tx.commit().await?;

        Ok(DressInstanceRepo::list_by_model(&self.pool, model_id).await?)
    }

    /// Transactional core of [`adjust_instance_count`](Self::adjust_instance_count),
    /// for callers that already hold a transaction (e.g. model creation).
    ///
    /// Holds the model's row lock until the caller commits. Shrinking only
    /// ever deletes available instances, newest first.
    pub async fn apply_instance_count(
        &self,
        conn: &mut PgConnection,
        model_id: DbId,
        new_count: i64,
    ) -> RentalResult<()> {
        if new_count < 0 {
            return Err(RentalError::NegativeCount(new_count));
        }
        if !DressModelRepo::lock(&mut *conn, model_id).await? {
            return Err(RentalError::NotFound {
                entity: MODEL,
                id: model_id,
            });
        }

        let current = DressInstanceRepo::count_for_model(&mut *conn, model_id).await?;

        match new_count.cmp(&current) {
            Ordering::Greater => {
                let existing = DressInstanceRepo::labels_for_model(&mut *conn, model_id).await?;
                let labels: Vec<String> =
                    next_label_numbers(existing.iter().map(String::as_str), new_count - current)
                        .map(format_label)
                        .collect();
                let created = DressInstanceRepo::insert_available(&mut *conn, model_id, &labels).await?;
                tracing::info!(model_id, created, new_count, "Dress instances created");
            }
            Ordering::Less => {
                let requested = current - new_count;
                let cutoff = self.window.cutoff(Self::now());
                let reclaimed =
                    DressInstanceRepo::release_expired_for_model_in(&mut *conn, model_id, cutoff)
                        .await?;
                if reclaimed > 0 {
                    tracing::info!(model_id, reclaimed, "Released expired holds before shrinking");
                }

                let available =
                    DressInstanceRepo::lock_available_newest_first(&mut *conn, model_id).await?;
                let insufficient = || RentalError::InsufficientAvailableInstances {
                    model_id,
                    requested,
                    available: available.len() as i64,
                };

                if (available.len() as i64) < requested {
                    return Err(insufficient());
                }

                let doomed = &available[..requested as usize];
                let deleted = DressInstanceRepo::delete_available(&mut *conn, doomed).await?;
                if deleted != doomed.len() as u64 {
                    return Err(insufficient());
                }
                tracing::info!(model_id, deleted, new_count, "Dress instances removed");
            }
            Ordering::Equal => {
                tracing::debug!(model_id, new_count, "Instance count unchanged");
            }
        }

        Ok(())
    }

    /// Delete a single instance. Rented instances are refused.
    pub async fn delete_instance(&self, id: DbId) -> RentalResult<()> {
        let mut last_seen = None;
        for _ in 0..MAX_DELETE_ATTEMPTS {
            if DressInstanceRepo::delete_unless_rented(&self.pool, id).await? {
                tracing::info!(instance_id = id, "Dress instance deleted");
                return Ok(());
            }

            match DressInstanceRepo::find_by_id(&self.pool, id).await? {
                None => return Err(RentalError::NotFound { entity: INSTANCE, id }),
                Some(instance) if instance.status() == InstanceStatus::Rented => {
                    return Err(RentalError::InstanceRented { id });
                }
                // Returned between the delete and the read; try again.
                Some(instance) => last_seen = Some(instance.status()),
            }
        }

        tracing::warn!(instance_id = id, "Instance kept changing status during delete");
        Err(delete_retries_exhausted(id, last_seen))
    }
}

/// Error for a delete that lost every attempt to a concurrent status change.
/// Reports the last status observed rather than guessing.
fn delete_retries_exhausted(id: DbId, last_seen: Option<InstanceStatus>) -> RentalError {
    match last_seen {
        Some(InstanceStatus::Rented) => RentalError::InstanceRented { id },
        Some(status) => RentalError::InvalidState {
            id,
            status,
            action: "delete",
        },
        None => RentalError::NotFound { entity: INSTANCE, id },
    }
}
