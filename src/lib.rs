//! Community Center Booking Library
//! # Overview
//!
//! This library runs the booking engine of a community center: citizens and
//! clients reserve the facility, the facility manager approves or rejects
//! reservations, and citizens buy tickets to public events.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (TimeValue, User, Event, Ticket, etc.)
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Business logic components:
//!   - [`core::facility`] - Reservation, approval, cancellation and ticket orchestration
//!   - [`core::user_registry`] - User accounts, authentication and balances
//!   - [`core::policy`] - Pricing, hour caps and the refund schedule
//! - [`io`] - CSV persistence of the facility state
//! - [`session`] - Runs one command against a loaded facility
//!
//! # Roles
//!
//! - **Citizen** (resident or non-resident): books up to 24 hours, buys tickets
//! - **Client** (city or organization): books up to 48 or 36 hours, no weddings
//! - **Facility manager**: approves and rejects requests, collects all payments
//!
//! # Money
//!
//! A reservation costs a $10 service charge plus an hourly rate that depends
//! on the role. Cancelling more than a week ahead refunds everything but the
//! service charge, more than a day ahead refunds 99% of that, and anything
//! later refunds nothing. Ticket refunds are always at full price.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod session;
pub mod types;

pub use core::{Clock, Facility, FixedClock, UserRegistry};
pub use io::DataStore;
pub use session::{Credentials, Session, SessionConfig};
pub use types::{
    BookingDetails, BookingError, CardDetails, ErrorKind, Event, EventId, GuestType, Layout,
    RequestId, ReservationRequest, Role, Ticket, TimeValue, User,
};
