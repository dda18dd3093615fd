//! Command session
//!
//! A [`Session`] ties one invocation together: it loads the facility from the
//! data directory, runs a single [`Command`] against it as the logged-in user,
//! writes human-readable results to the given writer, and saves state back if
//! the command changed anything.
//!
//! # Design
//!
//! The session focuses on orchestration, delegating:
//! - Loading and saving to `DataStore`
//! - Every reservation, ticket and balance rule to `Facility`
//! - Time-dependent rules to the `FixedClock` built from the configured "now"

use crate::cli::{CardArgs, Command};
use crate::core::{Facility, FixedClock};
use crate::io::DataStore;
use crate::types::{
    BookingDetails, BookingError, CardDetails, Event, Ticket, TicketOutcome, TimeValue, User,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Everything needed to open a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Directory holding the CSV state files
    pub data_dir: PathBuf,
    /// The simulated current date and hour
    pub now: TimeValue,
    /// Facility manager override; the first manager on file otherwise
    pub manager: Option<String>,
}

/// Username and password supplied on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A loaded facility plus the clock and store it was opened with
#[derive(Debug)]
pub struct Session {
    store: DataStore,
    facility: Facility,
    clock: FixedClock,
}

impl Session {
    /// Load the facility described by `config`
    ///
    /// # Errors
    ///
    /// - `ManagerNotFound` if the data directory has no usable facility manager
    /// - `IoError` if an existing state file cannot be read
    pub fn open(config: SessionConfig) -> Result<Self, BookingError> {
        let store = DataStore::new(config.data_dir);
        let facility = store.load_facility(config.manager.as_deref())?;
        debug!(
            dir = %store.dir().display(),
            now = %config.now,
            manager = facility.manager(),
            "session opened"
        );

        Ok(Session {
            store,
            facility,
            clock: FixedClock(config.now),
        })
    }

    pub fn facility(&self) -> &Facility {
        &self.facility
    }

    /// Write the facility back to the data directory
    pub fn save(&self) -> Result<(), BookingError> {
        self.store.save(&self.facility)
    }

    /// Run one command and write its results to `out`
    ///
    /// # Arguments
    ///
    /// * `command` - The operation to run
    /// * `credentials` - Login details; every command except `schedule` and
    ///   `register` needs them
    /// * `out` - Where human-readable results go
    ///
    /// # Errors
    ///
    /// - `NotLoggedIn` or `InvalidCredentials` if the command needs a user
    /// - Any rejection from the facility, unchanged
    pub fn execute(
        &mut self,
        command: &Command,
        credentials: Option<&Credentials>,
        out: &mut dyn Write,
    ) -> Result<(), BookingError> {
        let result = self.dispatch(command, credentials, out);
        if let Err(e) = &result {
            warn!(error = %e, kind = ?e.kind(), "command rejected");
        }
        result
    }

    fn dispatch(
        &mut self,
        command: &Command,
        credentials: Option<&Credentials>,
        out: &mut dyn Write,
    ) -> Result<(), BookingError> {
        match command {
            Command::Schedule => {
                let events = self.facility.schedule(&self.clock);
                if events.is_empty() {
                    writeln!(out, "No upcoming events.")?;
                }
                for event in events {
                    writeln!(out, "{}", event)?;
                }
            }

            Command::Register {
                username,
                password,
                kind,
            } => {
                let role = kind.role();
                self.facility
                    .register_user(User::new(username, password, role))?;
                writeln!(out, "Registered {} ({}).", username, role)?;
            }

            Command::RequestEvent {
                slot,
                duration,
                layout,
                guest_type,
                private,
                price,
                card,
            } => {
                let username = self.login(credentials)?;
                let booking = BookingDetails {
                    when: slot.when()?,
                    duration_hours: *duration,
                    layout: *layout,
                    guest_type: *guest_type,
                    is_public: !*private,
                    price_per_ticket: *price,
                    card: card_details(card)?,
                };
                let id = self.facility.request_event(&username, booking)?;
                let submitted = self.facility.pending_requests().iter().find(|r| r.id == id);
                if let Some(request) = submitted {
                    writeln!(
                        out,
                        "Reservation request #{} submitted: {}. Charged ${}.",
                        id,
                        request,
                        request.payment.amount()
                    )?;
                }
            }

            Command::Pending => {
                let username = self.login(credentials)?;
                let requests = if username == self.facility.manager() {
                    self.facility.pending_requests().iter().collect()
                } else {
                    self.facility.requests_by(&username)
                };
                if requests.is_empty() {
                    writeln!(out, "No pending requests.")?;
                }
                for request in requests {
                    writeln!(
                        out,
                        "#{} {} (requested by {}, paid ${})",
                        request.id,
                        request,
                        request.requester,
                        request.payment.amount()
                    )?;
                }
            }

            Command::Approve { request_id } => {
                let username = self.login(credentials)?;
                let event_id = self.facility.approve_request(&username, *request_id)?;
                writeln!(out, "Approved request #{} as event #{}.", request_id, event_id)?;
            }

            Command::Reject { request_id } => {
                let username = self.login(credentials)?;
                let refund = self.facility.reject_request(&username, *request_id)?;
                writeln!(out, "Rejected request #{}. Refunded ${}.", request_id, refund)?;
            }

            Command::CancelEvent { slot } => {
                let username = self.login(credentials)?;
                let receipt = self
                    .facility
                    .cancel_event(&self.clock, &username, slot.when()?)?;
                writeln!(
                    out,
                    "Event cancelled. Refunded ${} to you and {} ticket holder(s).",
                    receipt.refund, receipt.tickets_refunded
                )?;
            }

            Command::BuyTicket { slot, card } => {
                let username = self.login(credentials)?;
                let when = slot.when()?;
                let outcome = self
                    .facility
                    .request_ticket(&username, when, card_details(card)?)?;
                match outcome {
                    TicketOutcome::Issued(ticket) => {
                        if let Some(event) = self.facility.event_at(when) {
                            write_ticket(out, event, &ticket)?;
                        }
                    }
                    TicketOutcome::Waitlisted { position } => {
                        writeln!(
                            out,
                            "Event is sold out. You are #{} on the waitlist.",
                            position
                        )?;
                    }
                }
            }

            Command::RefundTicket { slot } => {
                let username = self.login(credentials)?;
                let refund = self
                    .facility
                    .refund_ticket(&self.clock, &username, slot.when()?)?;
                writeln!(out, "Ticket refunded: ${}.", refund.amount)?;
                if let Some(promoted) = refund.promoted {
                    writeln!(out, "{} was moved off the waitlist.", promoted)?;
                }
            }

            Command::MyTickets => {
                let username = self.login(credentials)?;
                let tickets = self.facility.tickets_held_by(&username);
                if tickets.is_empty() {
                    writeln!(out, "No tickets.")?;
                }
                for (event, ticket) in tickets {
                    write_ticket(out, event, ticket)?;
                }
            }

            Command::MyEvents => {
                let username = self.login(credentials)?;
                let events = self.facility.events_organized_by(&username);
                let requests = self.facility.requests_by(&username);
                if events.is_empty() && requests.is_empty() {
                    writeln!(out, "No events.")?;
                }
                for event in events {
                    writeln!(out, "{}", event)?;
                }
                for request in requests {
                    writeln!(out, "Pending #{}: {}", request.id, request)?;
                }
            }

            Command::Balance => {
                let username = self.login(credentials)?;
                let user = self.facility.users().require(&username)?;
                writeln!(out, "Balance: ${}", user.balance())?;
                writeln!(out, "Booked hours: {}", user.booked_hours())?;
            }

            Command::ClaimBalance => {
                let username = self.login(credentials)?;
                let claimed = self.facility.users_mut().claim_balance(&username)?;
                writeln!(out, "Claimed ${}.", claimed)?;
            }
        }
        Ok(())
    }

    fn login(&self, credentials: Option<&Credentials>) -> Result<String, BookingError> {
        let credentials = credentials.ok_or(BookingError::NotLoggedIn)?;
        let user = self
            .facility
            .users()
            .authenticate(&credentials.username, &credentials.password)?;
        Ok(user.username().to_string())
    }
}

/// Open a session, run `command`, and save if it changed anything
///
/// # Errors
///
/// Returns the first error from opening, running or saving. Nothing is saved
/// when the command fails.
pub fn run(
    config: SessionConfig,
    command: &Command,
    credentials: Option<&Credentials>,
    out: &mut dyn Write,
) -> Result<(), BookingError> {
    let mut session = Session::open(config)?;
    session.execute(command, credentials, out)?;
    if command.is_mutating() {
        session.save()?;
    }
    Ok(())
}

fn card_details(card: &CardArgs) -> Result<CardDetails, BookingError> {
    CardDetails::new(&card.number, &card.cvv, &card.expiry)
}

fn write_ticket(out: &mut dyn Write, event: &Event, ticket: &Ticket) -> std::io::Result<()> {
    let visibility = if event.is_public { "Public" } else { "Private" };
    writeln!(out, "{}'s Ticket", ticket.holder)?;
    writeln!(out, "Time: {}", event.when)?;
    writeln!(
        out,
        "Event: {} event for {} hours, with layout {}",
        visibility, event.duration_hours, event.layout
    )?;
    writeln!(out, "Cost: ${}", event.price_per_ticket)
}
