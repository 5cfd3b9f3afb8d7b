//! Liveness probe, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Hold length this instance enforces, so operators can confirm the
    /// deployed `RESERVATION_WINDOW_MINUTES`.
    pub reservation_window_minutes: i64,
    pub reservation_sweep_interval_secs: u64,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let db_healthy = match bridal_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database unreachable from health check");
            false
        }
    };

    Json(HealthReport {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        reservation_window_minutes: state.config.reservation_window_minutes,
        reservation_sweep_interval_secs: state.config.reservation_sweep_interval_secs,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
