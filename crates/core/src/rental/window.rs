//! The soft-hold window applied to reserved instances.

use chrono::TimeDelta;

use crate::types::Timestamp;

/// Minutes a reservation stays valid unless configured otherwise.
pub const DEFAULT_RESERVATION_WINDOW_MINUTES: i64 = 15;

/// How long a `Reserved` instance is held for its prospective renter.
///
/// A hold stamped at `reserved_at` is live while `reserved_at >= now - window`
/// and expired once `reserved_at < now - window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationWindow(TimeDelta);

impl ReservationWindow {
    pub fn from_minutes(minutes: i64) -> Self {
        Self(TimeDelta::minutes(minutes))
    }

    pub fn duration(&self) -> TimeDelta {
        self.0
    }

    /// Holds stamped strictly before the returned instant are expired.
    pub fn cutoff(&self, now: Timestamp) -> Timestamp {
        now - self.0
    }

    pub fn expires_at(&self, reserved_at: Timestamp) -> Timestamp {
        reserved_at + self.0
    }

    pub fn is_expired(&self, reserved_at: Timestamp, now: Timestamp) -> bool {
        reserved_at < self.cutoff(now)
    }
}

impl Default for ReservationWindow {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_RESERVATION_WINDOW_MINUTES)
    }
}
