//! Closed representation of an instance's lifecycle state.
//!
//! The database stores `status_id`, `reserved_at`, `rental_start` and
//! `rental_end` as independent columns. [`InstanceState::from_parts`] is the
//! single place where those columns are folded into a variant, so a row that
//! breaks the lifecycle invariants cannot be represented downstream.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{RentalDate, Timestamp};

/// Lifecycle status without its attached data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Available,
    Reserved,
    Rented,
    Maintenance,
}

impl InstanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Rented => "rented",
            Self::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inclusive range of rental days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentalPeriod {
    #[serde(rename = "rental_start")]
    start: RentalDate,
    #[serde(rename = "rental_end")]
    end: RentalDate,
}

impl RentalPeriod {
    /// Build a period, rejecting one that ends before it starts.
    pub fn new(start: RentalDate, end: RentalDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::Validation(format!(
                "Rental period ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> RentalDate {
        self.start
    }

    pub fn end(&self) -> RentalDate {
        self.end
    }

    /// Both ends are inclusive, so periods sharing a single day overlap.
    /// Mirrors the SQL predicate `rental_end >= $start AND rental_start <= $end`.
    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        self.end >= other.start && self.start <= other.end
    }
}

/// Lifecycle state of one physical dress unit.
///
/// Serializes flat, e.g. `{"status": "rented", "rental_start": "...",
/// "rental_end": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstanceState {
    Available,
    /// Soft hold taken during checkout. `tentative` records the dates the
    /// renter asked for; they become binding only on confirmation.
    Reserved {
        reserved_at: Timestamp,
        #[serde(flatten)]
        tentative: Option<RentalPeriod>,
    },
    Rented {
        #[serde(flatten)]
        period: RentalPeriod,
    },
    Maintenance,
}

impl InstanceState {
    /// Fold stored columns into a state, enforcing the lifecycle invariants.
    pub fn from_parts(
        status: InstanceStatus,
        reserved_at: Option<Timestamp>,
        rental_start: Option<RentalDate>,
        rental_end: Option<RentalDate>,
    ) -> Result<Self, CoreError> {
        let period = match (rental_start, rental_end) {
            (Some(start), Some(end)) => Some(RentalPeriod::new(start, end)?),
            (None, None) => None,
            _ => {
                return Err(CoreError::Internal(format!(
                    "{status} instance has a half-open rental period"
                )))
            }
        };

        match (status, reserved_at, period) {
            (InstanceStatus::Available, None, None) => Ok(Self::Available),
            (InstanceStatus::Maintenance, None, None) => Ok(Self::Maintenance),
            (InstanceStatus::Reserved, Some(reserved_at), tentative) => Ok(Self::Reserved {
                reserved_at,
                tentative,
            }),
            (InstanceStatus::Rented, None, Some(period)) => Ok(Self::Rented { period }),
            _ => Err(CoreError::Internal(format!(
                "{status} instance has inconsistent reservation columns"
            ))),
        }
    }

    pub fn status(&self) -> InstanceStatus {
        match self {
            Self::Available => InstanceStatus::Available,
            Self::Reserved { .. } => InstanceStatus::Reserved,
            Self::Rented { .. } => InstanceStatus::Rented,
            Self::Maintenance => InstanceStatus::Maintenance,
        }
    }

    pub fn reserved_at(&self) -> Option<Timestamp> {
        match self {
            Self::Reserved { reserved_at, .. } => Some(*reserved_at),
            _ => None,
        }
    }

    /// Confirmed dates for a rental, or tentative dates for a hold.
    pub fn rental_period(&self) -> Option<RentalPeriod> {
        match self {
            Self::Reserved { tentative, .. } => *tentative,
            Self::Rented { period } => Some(*period),
            _ => None,
        }
    }
}
