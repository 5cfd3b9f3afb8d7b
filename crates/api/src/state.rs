use std::sync::Arc;

use crate::config::ServerConfig;
use crate::rental::RentalInstanceManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bridal_db::DbPool,
    /// Server configuration, reported by `/health`.
    pub config: Arc<ServerConfig>,
    /// Sole writer of dress instance lifecycle state.
    pub rentals: RentalInstanceManager,
}
