//! Route definitions for the `/dress-instances` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::dress_instance;
use crate::state::AppState;

/// Routes mounted at `/dress-instances`.
///
/// ```text
/// POST   /check-expired       -> check_expired
/// GET    /{id}                -> get_instance
/// DELETE /{id}                -> delete_instance
/// POST   /{id}/release        -> release
/// POST   /{id}/confirm        -> confirm
/// POST   /{id}/return         -> return_instance
/// POST   /{id}/maintenance    -> start_maintenance
/// DELETE /{id}/maintenance    -> end_maintenance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check-expired", post(dress_instance::check_expired))
        .route(
            "/{id}",
            get(dress_instance::get_instance).delete(dress_instance::delete_instance),
        )
        .route("/{id}/release", post(dress_instance::release))
        .route("/{id}/confirm", post(dress_instance::confirm))
        .route("/{id}/return", post(dress_instance::return_instance))
        .route(
            "/{id}/maintenance",
            post(dress_instance::start_maintenance).delete(dress_instance::end_maintenance),
        )
}
