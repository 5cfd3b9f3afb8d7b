pub mod dress_instances;
pub mod dress_models;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dress-models                                 list, create
/// /dress-models/{id}                            get, update, delete
/// /dress-models/{id}/stock                      adjust instance count (PUT)
/// /dress-models/{id}/instances                  list instances (GET)
/// /dress-models/{id}/availability               status counts (GET)
/// /dress-models/{id}/reserve                    hold one instance (POST)
///
/// /dress-instances/check-expired                run the expiry sweep (POST)
/// /dress-instances/{id}                         get, delete
/// /dress-instances/{id}/release                 drop a hold (POST)
/// /dress-instances/{id}/confirm                 confirm and rent (POST)
/// /dress-instances/{id}/return                  return a rented dress (POST)
/// /dress-instances/{id}/maintenance             start (POST), end (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dress-models", dress_models::router())
        .nest("/dress-instances", dress_instances::router())
}
