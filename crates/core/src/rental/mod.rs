//! Dress rental instance lifecycle rules.
//!
//! Each physical dress unit moves through a small state machine:
//!
//! ```text
//! Available --reserve--> Reserved --confirm--> Rented --return--> Available
//!     ^                     |                     |
//!     +--release / expire---+                     +--return--> Maintenance
//!     ^                                                            |
//!     +-----------------------end maintenance---------------------+
//! ```
//!
//! This module only describes the rules. Every transition is applied by a
//! conditional write in the database layer so that concurrent callers never
//! observe two holders for the same unit.

pub mod labels;
pub mod state;
pub mod window;

pub use state::{InstanceState, InstanceStatus, RentalPeriod};
pub use window::ReservationWindow;
