//! Facility booking engine
//!
//! This module provides the `Facility`, which owns every confirmed event, every
//! pending reservation request and the user registry, and orchestrates all
//! operations that move hours, seats or money between them.
//!
//! The facility enforces business rules such as:
//! - Operating hours, duration limits and exact-hour slot collisions
//! - Per-role booked-hour caps and layout restrictions
//! - Ticket capacity with a first-in first-out waitlist
//! - The cancellation refund schedule
//!
//! Every operation validates fully before it mutates anything, so a rejected
//! operation leaves the facility exactly as it was.

use crate::core::policy;
use crate::core::traits::Clock;
use crate::core::user_registry::{Posting, UserRegistry};
use crate::types::{
    BookingDetails, BookingError, CancellationReceipt, CardDetails, Event, EventId, Payment,
    RequestId, ReservationRequest, Role, Ticket, TicketOutcome, TicketRefund, TimeValue, User,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Community center booking engine
///
/// Confirmed events are kept in confirmation order and pending requests in
/// submission order. Users never hold copies of events or tickets; per-user
/// views are computed from these collections on demand.
#[derive(Debug)]
pub struct Facility {
    users: UserRegistry,
    manager: String,
    confirmed: Vec<Event>,
    pending: Vec<ReservationRequest>,
    next_event_id: EventId,
    next_request_id: RequestId,
}

impl Facility {
    /// Create a facility run by `manager`
    ///
    /// # Arguments
    ///
    /// * `users` - Registry of every known user
    /// * `manager` - Username of the facility manager who collects all revenue
    ///
    /// # Errors
    ///
    /// Returns `ManagerNotFound` if `manager` is not a registered facility manager.
    pub fn new(users: UserRegistry, manager: &str) -> Result<Self, BookingError> {
        match users.get(manager) {
            Some(user) if user.role().is_manager() => {}
            _ => {
                return Err(BookingError::ManagerNotFound {
                    username: Some(manager.to_string()),
                })
            }
        }

        Ok(Facility {
            users,
            manager: manager.to_string(),
            confirmed: Vec::new(),
            pending: Vec::new(),
            next_event_id: 1,
            next_request_id: 1,
        })
    }

    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut UserRegistry {
        &mut self.users
    }

    /// Username of the facility manager
    pub fn manager(&self) -> &str {
        &self.manager
    }

    /// Register a new user account
    pub fn register_user(&mut self, user: User) -> Result<(), BookingError> {
        let username = user.username().to_string();
        let role = user.role();
        self.users.register(user)?;
        info!(username = %username, role = %role, "user registered");
        Ok(())
    }

    /// Cost for `requester` to book the facility for `duration_hours`
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the requester is unknown
    /// - `RoleNotPermitted` if the requester's role has no hourly rate
    pub fn calculate_event_cost(
        &self,
        requester: &str,
        duration_hours: u32,
    ) -> Result<Decimal, BookingError> {
        let user = self.users.require(requester)?;
        let rate = user
            .role()
            .hourly_rate()
            .ok_or_else(|| BookingError::role_not_permitted(requester, "request events"))?;

        policy::event_cost(rate, duration_hours)
            .ok_or_else(|| BookingError::arithmetic_overflow("event cost", requester))
    }

    /// Submit a paid reservation request for the manager to review
    ///
    /// On success the reservation cost is captured from the card, the manager
    /// is credited, and the requester's booked hours grow by the duration.
    /// Private events always carry a ticket price of zero.
    ///
    /// # Arguments
    ///
    /// * `requester` - Username of the citizen or client booking the facility
    /// * `booking` - Date, hour, duration, room setup, audience and payment card
    ///
    /// # Returns
    ///
    /// The id of the new pending request
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `UserNotFound`, `RoleNotPermitted`, `OutsideOperatingHours` or `InvalidPrice`
    /// - `InvalidDuration` unless `1 <= duration <= hours until closing`
    /// - `SlotTaken` if a confirmed event starts at the same date and hour
    /// - `Overbooked` if the duration would push the requester past their cap
    /// - `LayoutNotPermitted` if the requester's role may not book the layout
    pub fn request_event(
        &mut self,
        requester: &str,
        booking: BookingDetails,
    ) -> Result<RequestId, BookingError> {
        let user = self.users.require(requester)?;
        let role = user.role();
        let booked = user.booked_hours();
        let cost = self.calculate_event_cost(requester, booking.duration_hours)?;

        if !booking.when.is_within_operating_hours() {
            return Err(BookingError::OutsideOperatingHours {
                hour: booking.when.hour(),
            });
        }
        if booking.price_per_ticket < Decimal::ZERO {
            return Err(BookingError::InvalidPrice {
                price: booking.price_per_ticket,
            });
        }

        let max = booking.when.hours_until_close();
        if booking.duration_hours < 1 || booking.duration_hours > max {
            return Err(BookingError::InvalidDuration {
                requested: booking.duration_hours,
                max,
            });
        }

        if self.event_at(booking.when).is_some() {
            debug!(username = requester, when = %booking.when, "slot already taken");
            return Err(BookingError::SlotTaken { when: booking.when });
        }

        if role.has_overbooked(booked, booking.duration_hours) {
            return Err(BookingError::overbooked(
                requester,
                booked,
                booking.duration_hours,
                role.booking_cap().unwrap_or_default(),
            ));
        }

        if !role.permits_layout(booking.layout) {
            return Err(BookingError::LayoutNotPermitted {
                username: requester.to_string(),
                layout: booking.layout,
            });
        }

        let new_booked = booked
            .checked_add(booking.duration_hours)
            .ok_or_else(|| BookingError::arithmetic_overflow("booked hours", requester))?;

        // The credit is the only step that can fail
        self.users.add_to_balance(&self.manager, cost)?;
        self.users.set_booked_hours(requester, new_booked)?;

        let price_per_ticket = if booking.is_public {
            booking.price_per_ticket
        } else {
            Decimal::ZERO
        };

        let id = self.allocate_request_id();
        let payment = Payment::capture(cost, booking.card);
        info!(
            request_id = id,
            username = requester,
            when = %booking.when,
            amount = %cost,
            card = payment.card().last_four(),
            "reservation requested"
        );

        self.pending.push(ReservationRequest {
            id,
            requester: requester.to_string(),
            when: booking.when,
            duration_hours: booking.duration_hours,
            layout: booking.layout,
            guest_type: booking.guest_type,
            is_public: booking.is_public,
            price_per_ticket,
            payment,
        });
        Ok(id)
    }

    /// Approve a pending request, turning it into a confirmed event
    ///
    /// # Errors
    ///
    /// - `RoleNotPermitted` if `actor` is not the facility manager
    /// - `RequestNotFound` if no pending request has this id
    /// - `SlotTaken` if a confirmed event already starts at the same date and hour
    pub fn approve_request(
        &mut self,
        actor: &str,
        request_id: RequestId,
    ) -> Result<EventId, BookingError> {
        self.require_manager(actor, "approve reservation requests")?;

        let index = self.pending_index(request_id)?;
        let when = self.pending[index].when;
        if self.event_at(when).is_some() {
            debug!(request_id, when = %when, "slot already taken");
            return Err(BookingError::SlotTaken { when });
        }

        let request = self.pending.remove(index);
        let event_id = self.allocate_event_id();
        let event = request.into_event(event_id);
        info!(
            request_id,
            event_id,
            organizer = %event.organizer,
            when = %event.when,
            "reservation approved"
        );
        self.confirmed.push(event);
        Ok(event_id)
    }

    /// Reject a pending request, refunding its payment in full
    ///
    /// The requester's booked hours are released and the request is dropped.
    ///
    /// # Errors
    ///
    /// - `RoleNotPermitted` if `actor` is not the facility manager
    /// - `RequestNotFound` if no pending request has this id
    pub fn reject_request(
        &mut self,
        actor: &str,
        request_id: RequestId,
    ) -> Result<Decimal, BookingError> {
        self.require_manager(actor, "reject reservation requests")?;

        let index = self.pending_index(request_id)?;
        let request = &self.pending[index];
        let amount = request.payment.amount();
        self.users.post_all(&[
            Posting::debit(&self.manager, amount),
            Posting::credit(&request.requester, amount),
        ])?;

        let request = self.pending.remove(index);
        self.release_hours(&request.requester, request.duration_hours);
        info!(
            request_id,
            username = %request.requester,
            amount = %amount,
            "reservation rejected"
        );
        Ok(amount)
    }

    /// Cancel a confirmed event
    ///
    /// The organizer is refunded according to how far ahead the cancellation
    /// is, every ticket holder is refunded at full price, and the event and
    /// its waitlist are dropped. All balance changes apply together or not at
    /// all.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the requester is unknown
    /// - `EventNotFound` if no confirmed event starts at `when`
    /// - `EventInPast` if the event started before now
    /// - `NotOrganizer` if the requester did not organize the event
    pub fn cancel_event(
        &mut self,
        clock: &dyn Clock,
        requester: &str,
        when: TimeValue,
    ) -> Result<CancellationReceipt, BookingError> {
        self.users.require(requester)?;
        let now = clock.now();

        let index = self.event_index(when)?;
        let event = &self.confirmed[index];
        if event.when < now {
            return Err(BookingError::EventInPast { when: event.when });
        }
        if event.organizer != requester {
            return Err(BookingError::NotOrganizer {
                username: requester.to_string(),
                event_id: event.id,
            });
        }

        let hours_until = event.when.hours_difference(&now);
        let refund = policy::cancellation_refund(event.payment.amount(), hours_until);

        let mut postings = vec![
            Posting::debit(&self.manager, refund),
            Posting::credit(&event.organizer, refund),
        ];
        for ticket in event.tickets() {
            postings.push(Posting::debit(&self.manager, event.price_per_ticket));
            postings.push(Posting::credit(&ticket.holder, event.price_per_ticket));
        }
        self.users.post_all(&postings)?;

        let event = self.confirmed.remove(index);
        self.release_hours(&event.organizer, event.duration_hours);
        if event.waitlist_len() > 0 {
            debug!(event_id = event.id, dropped = event.waitlist_len(), "waitlist dropped");
        }

        let receipt = CancellationReceipt {
            refund,
            tickets_refunded: event.tickets().len(),
        };
        info!(
            event_id = event.id,
            username = requester,
            refund = %refund,
            tickets_refunded = receipt.tickets_refunded,
            "event cancelled"
        );
        Ok(receipt)
    }

    /// Buy a ticket, or join the waitlist if the event is full
    ///
    /// A waitlisted citizen is not charged.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - `UserNotFound` or `RoleNotPermitted` if the buyer is not a citizen
    /// - `EventNotFound` if no confirmed event starts at `when`
    /// - `PrivateEvent` if the event sells no tickets
    /// - `DuplicateTicket` if the citizen already holds a ticket
    /// - `GuestTypeMismatch` if the event's audience excludes the citizen
    /// - `AlreadyWaitlisted` if the citizen is already queued
    pub fn request_ticket(
        &mut self,
        citizen: &str,
        when: TimeValue,
        card: CardDetails,
    ) -> Result<TicketOutcome, BookingError> {
        let status = self
            .users
            .require(citizen)?
            .role()
            .resident_status()
            .ok_or_else(|| BookingError::role_not_permitted(citizen, "buy tickets"))?;

        let index = self.event_index(when)?;
        let event = &self.confirmed[index];
        if !event.is_public {
            return Err(BookingError::PrivateEvent { event_id: event.id });
        }
        if event.holds_ticket(citizen) {
            return Err(BookingError::duplicate_ticket(citizen, event.id));
        }
        if !event.guest_type.admits(status) {
            return Err(BookingError::guest_type_mismatch(citizen, event.guest_type));
        }
        if event.is_waitlisted(citizen) {
            return Err(BookingError::AlreadyWaitlisted {
                username: citizen.to_string(),
                event_id: event.id,
            });
        }

        if event.is_sold_out() {
            let event = &mut self.confirmed[index];
            let position = event.add_to_waitlist(citizen);
            info!(event_id = event.id, username = citizen, position, "added to waitlist");
            return Ok(TicketOutcome::Waitlisted { position });
        }

        let price = event.price_per_ticket;
        self.users.add_to_balance(&self.manager, price)?;

        let event = &mut self.confirmed[index];
        let ticket = Ticket {
            holder: citizen.to_string(),
            event: event.id,
            payment: Some(Payment::capture(price, card)),
        };
        event.add_ticket(ticket.clone());
        info!(event_id = event.id, username = citizen, amount = %price, "ticket issued");
        Ok(TicketOutcome::Issued(ticket))
    }

    /// Refund a ticket at full price
    ///
    /// If anyone is waitlisted, the citizen at the front of the queue is
    /// given the freed seat and the manager is credited the ticket price again.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the citizen is unknown
    /// - `EventNotFound` if no confirmed event starts at `when`
    /// - `EventInPast` if the event started before now
    /// - `TicketNotFound` if the citizen holds no ticket for the event
    pub fn refund_ticket(
        &mut self,
        clock: &dyn Clock,
        citizen: &str,
        when: TimeValue,
    ) -> Result<TicketRefund, BookingError> {
        self.users.require(citizen)?;

        let index = self.event_index(when)?;
        let event = &self.confirmed[index];
        if event.when < clock.now() {
            return Err(BookingError::EventInPast { when: event.when });
        }
        if !event.holds_ticket(citizen) {
            return Err(BookingError::ticket_not_found(citizen, event.id));
        }

        let price = event.price_per_ticket;
        let mut postings = vec![
            Posting::debit(&self.manager, price),
            Posting::credit(citizen, price),
        ];
        if event.waitlist_len() > 0 {
            postings.push(Posting::credit(&self.manager, price));
        }
        self.users.post_all(&postings)?;

        let event = &mut self.confirmed[index];
        event.remove_ticket(citizen);
        let promoted = event.pop_waitlist();
        if let Some(next) = &promoted {
            event.add_ticket(Ticket {
                holder: next.clone(),
                event: event.id,
                payment: None,
            });
            info!(event_id = event.id, username = %next, "promoted from waitlist");
        }

        info!(event_id = event.id, username = citizen, amount = %price, "ticket refunded");
        Ok(TicketRefund {
            amount: price,
            promoted,
        })
    }

    /// Confirmed events on or after today, in confirmation order
    pub fn schedule(&self, clock: &dyn Clock) -> Vec<&Event> {
        let now = clock.now();
        self.confirmed
            .iter()
            .filter(|event| event.when.is_same_day_or_after(&now))
            .collect()
    }

    pub fn confirmed_events(&self) -> &[Event] {
        &self.confirmed
    }

    pub fn pending_requests(&self) -> &[ReservationRequest] {
        &self.pending
    }

    /// The first confirmed event starting at exactly `when`
    pub fn event_at(&self, when: TimeValue) -> Option<&Event> {
        self.confirmed.iter().find(|event| event.when == when)
    }

    /// Every ticket `username` holds, with the event it admits to
    pub fn tickets_held_by(&self, username: &str) -> Vec<(&Event, &Ticket)> {
        self.confirmed
            .iter()
            .filter_map(|event| {
                event
                    .tickets()
                    .iter()
                    .find(|ticket| ticket.holder == username)
                    .map(|ticket| (event, ticket))
            })
            .collect()
    }

    /// Confirmed events organized by `username`
    pub fn events_organized_by(&self, username: &str) -> Vec<&Event> {
        self.confirmed
            .iter()
            .filter(|event| event.organizer == username)
            .collect()
    }

    /// Pending requests submitted by `username`
    pub fn requests_by(&self, username: &str) -> Vec<&ReservationRequest> {
        self.pending
            .iter()
            .filter(|request| request.requester == username)
            .collect()
    }

    /// Add an already-confirmed event, as when loading saved state
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSlot` if a confirmed event already starts at the same date and hour.
    pub fn add_confirmed_event(&mut self, event: Event) -> Result<(), BookingError> {
        if let Some(existing) = self.event_at(event.when) {
            return Err(BookingError::DuplicateSlot {
                slot: existing.slot_key().to_string(),
            });
        }
        self.next_event_id = self.next_event_id.max(event.id.saturating_add(1));
        self.confirmed.push(event);
        Ok(())
    }

    /// Add a pending request, as when loading saved state
    pub fn add_pending_request(&mut self, request: ReservationRequest) {
        self.next_request_id = self.next_request_id.max(request.id.saturating_add(1));
        self.pending.push(request);
    }

    pub fn allocate_event_id(&mut self) -> EventId {
        let id = self.next_event_id;
        self.next_event_id += 1;
        id
    }

    pub fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Recompute every user's booked hours from confirmed events and pending
    /// requests
    pub fn derive_booked_hours(&mut self) {
        let mut hours: HashMap<String, u32> = HashMap::new();
        let organized = self
            .confirmed
            .iter()
            .map(|event| (&event.organizer, event.duration_hours));
        let requested = self
            .pending
            .iter()
            .map(|request| (&request.requester, request.duration_hours));
        for (username, duration) in organized.chain(requested) {
            let total = hours.entry(username.clone()).or_insert(0);
            *total = total.saturating_add(duration);
        }

        let usernames: Vec<String> = self
            .users
            .iter()
            .map(|user| user.username().to_string())
            .collect();
        for username in usernames {
            let booked = hours.get(&username).copied().unwrap_or(0);
            if let Some(user) = self.users.get_mut(&username) {
                user.set_booked_hours(booked);
            }
        }

        for username in hours.keys().filter(|name| !self.users.contains(name)) {
            warn!(username = %username, "booking held by unknown user");
        }
    }

    fn require_manager(&self, actor: &str, operation: &str) -> Result<(), BookingError> {
        let user = self.users.require(actor)?;
        if user.role() != Role::FacilityManager || actor != self.manager {
            return Err(BookingError::role_not_permitted(actor, operation));
        }
        Ok(())
    }

    fn pending_index(&self, request_id: RequestId) -> Result<usize, BookingError> {
        self.pending
            .iter()
            .position(|request| request.id == request_id)
            .ok_or(BookingError::RequestNotFound {
                request: request_id,
            })
    }

    fn event_index(&self, when: TimeValue) -> Result<usize, BookingError> {
        self.confirmed
            .iter()
            .position(|event| event.when == when)
            .ok_or(BookingError::EventNotFound { when })
    }

    fn release_hours(&mut self, username: &str, hours: u32) {
        if let Some(user) = self.users.get_mut(username) {
            let remaining = user.booked_hours().saturating_sub(hours);
            user.set_booked_hours(remaining);
        }
    }
}
