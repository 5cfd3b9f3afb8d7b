//! Domain rules for the bridal rental backend.
//!
//! Pure logic with no I/O. The database crate and the API server both build
//! on the types defined here.

pub mod error;
pub mod rental;
pub mod types;
