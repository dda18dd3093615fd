//! Error types for the community center booking engine
//!
//! This module defines every error that can occur while booking events,
//! selling tickets, or loading and saving facility state.
//!
//! # Error Categories
//!
//! - **Validation**: malformed dates, hours, card details, prices or durations
//! - **Policy violations**: overbooking, slot collisions, guest-type mismatches,
//!   duplicate tickets, role restrictions
//! - **Not found**: unknown users, events, requests or tickets
//! - **Temporal violations**: operating on an event that already happened
//! - **Storage**: file I/O and CSV failures

use crate::types::event::{EventId, GuestType, Layout, RequestId};
use crate::types::time::TimeValue;
use rust_decimal::Decimal;
use thiserror::Error;

/// Broad classification of a [`BookingError`]
///
/// Every rejection the facility produces falls into exactly one of these
/// buckets. Callers use it to decide whether re-prompting makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input
    Validation,
    /// A booking rule forbids the operation
    PolicyViolation,
    /// The referenced user, event, request or ticket does not exist
    NotFound,
    /// The referenced event is already in the past
    TemporalViolation,
    /// Reading or writing persisted state failed
    Storage,
}

/// Main error type for the booking engine
///
/// Each variant carries the context needed to explain the rejection to the
/// person at the console. No variant is produced after state was mutated:
/// facility operations validate fully before they change anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Date string is not a valid MM/DD/YYYY calendar date
    #[error("Invalid date '{input}' (expected MM/DD/YYYY)")]
    InvalidDate {
        /// The rejected input
        input: String,
    },

    /// Time string is not a whole hour between 0 and 23
    #[error("Invalid time '{input}' (expected an hour such as 9 or 09:00)")]
    InvalidTime {
        /// The rejected input
        input: String,
    },

    /// Requested hour falls outside the facility's operating hours
    #[error("Facility is closed at {hour:02}:00 (open 08:00 to 23:00)")]
    OutsideOperatingHours {
        /// The requested hour
        hour: u8,
    },

    /// Card number is not exactly 16 digits
    #[error("Invalid card number (must be 16 digits)")]
    InvalidCardNumber,

    /// CVV is not exactly 3 digits
    #[error("Invalid CVV '{input}' (must be 3 digits)")]
    InvalidCvv {
        /// The rejected input
        input: String,
    },

    /// Expiry is malformed or not later than 05/24
    #[error("Invalid expiration date '{input}' (must be MM/YY and later than 05/24)")]
    InvalidExpiry {
        /// The rejected input
        input: String,
    },

    /// Ticket price is negative
    #[error("Invalid ticket price {price}")]
    InvalidPrice {
        /// The rejected price
        price: Decimal,
    },

    /// Duration is zero or runs past closing time
    #[error("Invalid duration of {requested} hours (must be between 1 and {max})")]
    InvalidDuration {
        /// Requested duration in hours
        requested: u32,
        /// Hours left before the facility closes
        max: u32,
    },

    /// A confirmed event already starts at the requested date and hour
    #[error("Event already booked on {when}")]
    SlotTaken {
        /// The contested date and hour
        when: TimeValue,
    },

    /// A confirmed event with the same slot identity already exists
    #[error("A confirmed event already occupies slot {slot}")]
    DuplicateSlot {
        /// Human readable slot key
        slot: String,
    },

    /// Booking would push the user past their hourly cap
    #[error("{username} has overbooked: {booked} booked + {requested} requested exceeds cap of {cap} hours")]
    Overbooked {
        /// Username of the requester
        username: String,
        /// Hours already booked
        booked: u32,
        /// Hours requested
        requested: u32,
        /// The role's cap
        cap: u32,
    },

    /// The requester's role may not book this layout
    #[error("{username} may not book the {layout} layout")]
    LayoutNotPermitted {
        /// Username of the requester
        username: String,
        /// The requested layout
        layout: Layout,
    },

    /// The user's role does not allow the operation
    #[error("{username} is not permitted to {operation}")]
    RoleNotPermitted {
        /// Username of the actor
        username: String,
        /// Operation that was attempted
        operation: String,
    },

    /// Only the event organizer may cancel it
    #[error("{username} is not the organizer of event {event_id}")]
    NotOrganizer {
        /// Username of the actor
        username: String,
        /// The event
        event_id: EventId,
    },

    /// Tickets are only sold for public events
    #[error("Event {event_id} is private and does not have tickets for sale")]
    PrivateEvent {
        /// The event
        event_id: EventId,
    },

    /// The citizen already holds a ticket for the event
    #[error("{username} already has a ticket for event {event_id}")]
    DuplicateTicket {
        /// Username of the citizen
        username: String,
        /// The event
        event_id: EventId,
    },

    /// The citizen is already queued on the event's waitlist
    #[error("{username} is already on the waitlist for event {event_id}")]
    AlreadyWaitlisted {
        /// Username of the citizen
        username: String,
        /// The event
        event_id: EventId,
    },

    /// The citizen's resident status is excluded by the event's guest type
    #[error("{username} cannot attend an event restricted to {guest_type}")]
    GuestTypeMismatch {
        /// Username of the citizen
        username: String,
        /// The event's audience restriction
        guest_type: GuestType,
    },

    /// No user with this username exists
    #[error("User '{username}' not found")]
    UserNotFound {
        /// The missing username
        username: String,
    },

    /// Username is empty, padded with whitespace, or contains the list separator
    #[error("Invalid username '{username}'")]
    InvalidUsername {
        /// The rejected username
        username: String,
    },

    /// Username is already registered
    #[error("Username '{username}' already exists")]
    DuplicateUser {
        /// The contested username
        username: String,
    },

    /// Username or password did not match
    #[error("Invalid credentials for '{username}'")]
    InvalidCredentials {
        /// The username that failed to authenticate
        username: String,
    },

    /// The command needs a logged-in user
    #[error("This command requires --user and --password")]
    NotLoggedIn,

    /// No confirmed event starts at the given date and hour
    #[error("No confirmed event on {when}")]
    EventNotFound {
        /// The searched date and hour
        when: TimeValue,
    },

    /// No pending reservation request has this id
    #[error("Reservation request {request} not found")]
    RequestNotFound {
        /// The missing request id
        request: RequestId,
    },

    /// The citizen holds no ticket for the event
    #[error("{username} has no ticket for event {event_id}")]
    TicketNotFound {
        /// Username of the citizen
        username: String,
        /// The event
        event_id: EventId,
    },

    /// The event already took place
    #[error("Event on {when} has already occurred")]
    EventInPast {
        /// When the event started
        when: TimeValue,
    },

    /// No facility manager could be found in the user records
    #[error("No facility manager{} found", username.as_ref().map(|u| format!(" '{}'", u)).unwrap_or_default())]
    ManagerNotFound {
        /// The configured manager username, if one was given
        username: Option<String>,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for {username}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Username of the affected user
        username: String,
    },
}

impl From<std::io::Error> for BookingError {
    fn from(error: std::io::Error) -> Self {
        BookingError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BookingError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BookingError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl BookingError {
    /// Classify this error into the rejection taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::IoError { .. } | BookingError::ParseError { .. } => ErrorKind::Storage,
            BookingError::InvalidDate { .. }
            | BookingError::InvalidTime { .. }
            | BookingError::OutsideOperatingHours { .. }
            | BookingError::InvalidCardNumber
            | BookingError::InvalidCvv { .. }
            | BookingError::InvalidExpiry { .. }
            | BookingError::InvalidPrice { .. }
            | BookingError::InvalidDuration { .. }
            | BookingError::InvalidUsername { .. }
            | BookingError::ArithmeticOverflow { .. } => ErrorKind::Validation,
            BookingError::SlotTaken { .. }
            | BookingError::DuplicateSlot { .. }
            | BookingError::Overbooked { .. }
            | BookingError::LayoutNotPermitted { .. }
            | BookingError::RoleNotPermitted { .. }
            | BookingError::NotOrganizer { .. }
            | BookingError::PrivateEvent { .. }
            | BookingError::DuplicateTicket { .. }
            | BookingError::AlreadyWaitlisted { .. }
            | BookingError::GuestTypeMismatch { .. }
            | BookingError::DuplicateUser { .. }
            | BookingError::InvalidCredentials { .. }
            | BookingError::NotLoggedIn => ErrorKind::PolicyViolation,
            BookingError::UserNotFound { .. }
            | BookingError::EventNotFound { .. }
            | BookingError::RequestNotFound { .. }
            | BookingError::TicketNotFound { .. }
            | BookingError::ManagerNotFound { .. } => ErrorKind::NotFound,
            BookingError::EventInPast { .. } => ErrorKind::TemporalViolation,
        }
    }

    /// Create a UserNotFound error
    pub fn user_not_found(username: &str) -> Self {
        BookingError::UserNotFound {
            username: username.to_string(),
        }
    }

    /// Create a RoleNotPermitted error
    pub fn role_not_permitted(username: &str, operation: &str) -> Self {
        BookingError::RoleNotPermitted {
            username: username.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create an Overbooked error
    pub fn overbooked(username: &str, booked: u32, requested: u32, cap: u32) -> Self {
        BookingError::Overbooked {
            username: username.to_string(),
            booked,
            requested,
            cap,
        }
    }

    /// Create a DuplicateTicket error
    pub fn duplicate_ticket(username: &str, event_id: EventId) -> Self {
        BookingError::DuplicateTicket {
            username: username.to_string(),
            event_id,
        }
    }

    /// Create a TicketNotFound error
    pub fn ticket_not_found(username: &str, event_id: EventId) -> Self {
        BookingError::TicketNotFound {
            username: username.to_string(),
            event_id,
        }
    }

    /// Create a GuestTypeMismatch error
    pub fn guest_type_mismatch(username: &str, guest_type: GuestType) -> Self {
        BookingError::GuestTypeMismatch {
            username: username.to_string(),
            guest_type,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, username: &str) -> Self {
        BookingError::ArithmeticOverflow {
            operation: operation.to_string(),
            username: username.to_string(),
        }
    }
}
