//! Core traits for time-dependent facility operations
//!
//! Cancellations, ticket refunds and the schedule all depend on "now". The
//! facility never reads the wall clock; callers inject a [`Clock`] instead.

use crate::types::TimeValue;

/// Source of the current simulated time
pub trait Clock {
    /// The current date and hour
    fn now(&self) -> TimeValue;
}

/// A clock stopped at a single moment
///
/// The command-line front end builds one from `--date` and `--hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub TimeValue);

impl Clock for FixedClock {
    fn now(&self) -> TimeValue {
        self.0
    }
}
