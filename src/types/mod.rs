//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `time`: Date-and-hour values and parsing
//! - `payment`: Card details and captured payments
//! - `user`: Users, roles and resident status
//! - `event`: Reservation requests, confirmed events and tickets
//! - `receipt`: Results of operations that move money
//! - `error`: Error types for the booking engine

pub mod error;
pub mod event;
pub mod payment;
pub mod receipt;
pub mod time;
pub mod user;

pub use error::{BookingError, ErrorKind};
pub use event::{
    BookingDetails, Event, EventId, GuestType, Layout, RequestId, ReservationRequest, SlotKey,
    Ticket, EVENT_CAPACITY,
};
pub use payment::{CardDetails, CardExpiry, Payment};
pub use receipt::{CancellationReceipt, TicketOutcome, TicketRefund};
pub use time::TimeValue;
pub use user::{ClientKind, ResidentStatus, Role, User, Username, LIST_SEPARATOR};
