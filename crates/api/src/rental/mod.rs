//! Dress rental instance lifecycle.
//!
//! [`RentalInstanceManager`] is the only component that mutates an
//! instance's status, hold timestamp or rental dates. Checkout handlers,
//! admin handlers and the background sweep all go through it.

pub mod manager;

use bridal_core::rental::InstanceStatus;
use bridal_core::types::DbId;

pub use manager::RentalInstanceManager;

/// Failures surfaced by [`RentalInstanceManager`].
///
/// Every business outcome is its own variant so callers can pick the right
/// user-facing message; store failures are kept apart in `Database`.
#[derive(Debug, thiserror::Error)]
pub enum RentalError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Dress instance {id} is {status}, cannot {action}")]
    InvalidState {
        id: DbId,
        status: InstanceStatus,
        action: &'static str,
    },

    #[error("Reservation for dress instance {id} has expired")]
    ReservationExpired { id: DbId },

    #[error(
        "Cannot remove {requested} instances of dress model {model_id}: only {available} are available"
    )]
    InsufficientAvailableInstances {
        model_id: DbId,
        requested: i64,
        available: i64,
    },

    #[error("Dress instance {id} is rented and cannot be deleted")]
    InstanceRented { id: DbId },

    #[error("Stock count must not be negative, got {0}")]
    NegativeCount(i64),

    #[error("Invalid rental dates: {0}")]
    InvalidDateRange(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RentalResult<T> = Result<T, RentalError>;
