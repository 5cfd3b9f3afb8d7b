//! Dress instance entity: one physical, individually tracked unit of a
//! dress model.

use bridal_core::rental::{InstanceState, InstanceStatus};
use bridal_core::types::{DbId, RentalDate, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use ts_rs::TS;

use super::status::{DressInstanceStatus, StatusId};

/// A row from the `dress_instances` table.
///
/// The status columns are folded into [`InstanceState`] on decode; a row
/// that violates the lifecycle invariants fails with [`sqlx::Error::Decode`].
#[derive(Debug, Clone, Serialize)]
pub struct DressInstance {
    pub id: DbId,
    pub model_id: DbId,
    pub label: String,
    #[serde(flatten)]
    pub state: InstanceState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DressInstance {
    pub fn status(&self) -> InstanceStatus {
        self.state.status()
    }
}

impl<'r> FromRow<'r, PgRow> for DressInstance {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let status_id: StatusId = row.try_get("status_id")?;
        let status = DressInstanceStatus::from_id(status_id).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "status_id".into(),
                source: format!("unknown dress instance status {status_id}").into(),
            }
        })?;
        let reserved_at: Option<Timestamp> = row.try_get("reserved_at")?;
        let rental_start: Option<RentalDate> = row.try_get("rental_start")?;
        let rental_end: Option<RentalDate> = row.try_get("rental_end")?;

        let state =
            InstanceState::from_parts(status.into(), reserved_at, rental_start, rental_end)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self {
            id: row.try_get("id")?,
            model_id: row.try_get("model_id")?,
            label: row.try_get("label")?,
            state,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Per-status instance counts for one model.
///
/// Reservations past their window are counted as available, matching how
/// `reserve` treats them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, TS)]
pub struct AvailabilitySummary {
    pub total: i64,
    pub available: i64,
    pub reserved: i64,
    pub rented: i64,
    pub maintenance: i64,
}

/// Body of `POST /dress-models/{id}/reserve` and
/// `POST /dress-instances/{id}/confirm`.
#[derive(Debug, Clone, Deserialize)]
pub struct RentalDatesRequest {
    pub start_date: RentalDate,
    pub end_date: RentalDate,
}

/// Body of `POST /dress-instances/{id}/return`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReturnInstanceRequest {
    /// Send the dress to maintenance instead of straight back to stock.
    #[serde(default)]
    pub needs_maintenance: bool,
}
