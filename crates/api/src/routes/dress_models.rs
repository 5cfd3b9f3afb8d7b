//! Route definitions for the `/dress-models` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::dress_model;
use crate::state::AppState;

/// Routes mounted at `/dress-models`.
///
/// ```text
/// GET    /                    -> list_models
/// POST   /                    -> create_model
/// GET    /{id}                -> get_model
/// PUT    /{id}                -> update_model
/// DELETE /{id}                -> delete_model
/// PUT    /{id}/stock          -> adjust_stock
/// GET    /{id}/instances      -> list_instances
/// GET    /{id}/availability   -> availability
/// POST   /{id}/reserve        -> reserve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(dress_model::list_models).post(dress_model::create_model),
        )
        .route(
            "/{id}",
            get(dress_model::get_model)
                .put(dress_model::update_model)
                .delete(dress_model::delete_model),
        )
        .route("/{id}/stock", put(dress_model::adjust_stock))
        .route("/{id}/instances", get(dress_model::list_instances))
        .route("/{id}/availability", get(dress_model::availability))
        .route("/{id}/reserve", post(dress_model::reserve))
}
