//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a `&mut PgConnection` inside a transaction) as the
//! first argument.

pub mod dress_instance_repo;
pub mod dress_model_repo;

pub use dress_instance_repo::DressInstanceRepo;
pub use dress_model_repo::DressModelRepo;
