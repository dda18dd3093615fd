//! Core business logic module
//!
//! This module contains the booking engine components:
//! - `traits` - The clock abstraction used for time-dependent rules
//! - `policy` - Pricing, hour caps and the cancellation refund schedule
//! - `user_registry` - User accounts, authentication and balance postings
//! - `facility` - Event, request and ticket orchestration

pub mod facility;
pub mod policy;
pub mod traits;
pub mod user_registry;

pub use facility::Facility;
pub use traits::{Clock, FixedClock};
pub use user_registry::{Posting, UserRegistry};
