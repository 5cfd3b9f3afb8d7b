//! Request handlers.
//!
//! Catalogue CRUD goes straight to the repositories; anything that touches
//! an instance's lifecycle goes through [`RentalInstanceManager`] on
//! [`AppState`]. Errors are mapped via [`AppError`].
//!
//! [`RentalInstanceManager`]: crate::rental::RentalInstanceManager
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod dress_instance;
pub mod dress_model;
