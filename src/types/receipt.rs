//! Results handed back by facility operations that move money

use super::event::Ticket;
use super::user::Username;
use rust_decimal::Decimal;

/// Outcome of a ticket request
#[derive(Debug, Clone, PartialEq)]
pub enum TicketOutcome {
    /// A paid ticket was issued
    Issued(Ticket),
    /// The event is full; the citizen was queued at this 1-based position
    Waitlisted { position: usize },
}

/// Money moved by an event cancellation
#[derive(Debug, Clone, PartialEq)]
pub struct CancellationReceipt {
    /// Amount returned to the organizer under the refund schedule
    pub refund: Decimal,
    /// Number of ticket holders refunded at full price
    pub tickets_refunded: usize,
}

/// Money moved by a ticket refund
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRefund {
    pub amount: Decimal,
    /// Citizen promoted off the waitlist into the freed seat
    pub promoted: Option<Username>,
}
