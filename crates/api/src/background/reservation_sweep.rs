//! Periodic release of expired checkout holds.
//!
//! Runs server-side on a fixed `tokio::time::interval`, independent of any
//! client being connected. The interval bounds how long an expired hold can
//! keep an instance looking unavailable; `reserve` and `confirm_and_rent`
//! also check the deadline themselves.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::rental::RentalInstanceManager;

/// Run the reservation sweep loop until `cancel` is triggered.
pub async fn run(rentals: RentalInstanceManager, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        window_minutes = rentals.window().duration().num_minutes(),
        "Reservation sweep started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reservation sweep stopping");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = rentals.check_and_release_expired_reservations().await {
                    tracing::error!(error = %e, "Reservation sweep failed");
                }
            }
        }
    }
}
