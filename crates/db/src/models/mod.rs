//! Row models and request DTOs.

pub mod dress_instance;
pub mod dress_model;
pub mod status;
