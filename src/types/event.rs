//! Reservation requests, confirmed events and tickets

use super::payment::{CardDetails, Payment};
use super::time::TimeValue;
use super::user::{ResidentStatus, Username};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Confirmed event identifier, assigned by the facility
pub type EventId = u32;

/// Pending reservation request identifier, assigned by the facility
pub type RequestId = u32;

/// Seats available at every event
pub const EVENT_CAPACITY: usize = 40;

/// Room setup for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Wedding,
    Meeting,
    Lecture,
    DanceRoom,
}

impl Layout {
    /// Stored form, as written to the event files
    pub fn as_str(&self) -> &'static str {
        match self {
            Layout::Wedding => "WEDDING",
            Layout::Meeting => "MEETING",
            Layout::Lecture => "LECTURE",
            Layout::DanceRoom => "DANCEROOM",
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wedding" => Ok(Layout::Wedding),
            "meeting" => Ok(Layout::Meeting),
            "lecture" => Ok(Layout::Lecture),
            "danceroom" | "dance-room" | "dance_room" | "dance" => Ok(Layout::DanceRoom),
            other => Err(format!("Unknown layout: {}", other)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Layout::Wedding => "wedding",
            Layout::Meeting => "meeting",
            Layout::Lecture => "lecture",
            Layout::DanceRoom => "dance room",
        };
        f.write_str(label)
    }
}

/// Who may attend an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuestType {
    Residents,
    NonResidents,
    Both,
}

impl GuestType {
    /// Stored form, as written to the event files
    pub fn as_str(&self) -> &'static str {
        match self {
            GuestType::Residents => "RESIDENTS",
            GuestType::NonResidents => "NONRESIDENTS",
            GuestType::Both => "BOTH",
        }
    }

    /// Does this audience restriction let a citizen of `status` in?
    pub fn admits(&self, status: ResidentStatus) -> bool {
        !matches!(
            (self, status),
            (GuestType::Residents, ResidentStatus::NonResident)
                | (GuestType::NonResidents, ResidentStatus::Resident)
        )
    }
}

impl FromStr for GuestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "residents" => Ok(GuestType::Residents),
            "nonresidents" | "non-residents" | "non_residents" => Ok(GuestType::NonResidents),
            "both" => Ok(GuestType::Both),
            other => Err(format!("Unknown guest type: {}", other)),
        }
    }
}

impl fmt::Display for GuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GuestType::Residents => "residents",
            GuestType::NonResidents => "non-residents",
            GuestType::Both => "both",
        };
        f.write_str(label)
    }
}

/// Stored form of the public flag
pub fn visibility_str(is_public: bool) -> &'static str {
    if is_public {
        "public"
    } else {
        "private"
    }
}

/// Parse the stored public flag
pub fn parse_visibility(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "public" | "true" => Ok(true),
        "private" | "false" => Ok(false),
        other => Err(format!("Unknown visibility: {}", other)),
    }
}

/// Slot identity of a confirmed event
///
/// Two confirmed events may not share a key. Price, duration and organizer
/// are not part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub when: TimeValue,
    pub layout: Layout,
    pub guest_type: GuestType,
    pub is_public: bool,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.when,
            self.layout,
            self.guest_type,
            visibility_str(self.is_public)
        )
    }
}

/// Everything a user supplies when asking to book the facility
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub when: TimeValue,
    pub duration_hours: u32,
    pub layout: Layout,
    pub guest_type: GuestType,
    pub is_public: bool,
    pub price_per_ticket: Decimal,
    pub card: CardDetails,
}

/// A paid booking awaiting the facility manager's decision
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRequest {
    pub id: RequestId,
    pub requester: Username,
    pub when: TimeValue,
    pub duration_hours: u32,
    pub layout: Layout,
    pub guest_type: GuestType,
    pub is_public: bool,
    pub price_per_ticket: Decimal,
    pub payment: Payment,
}

impl ReservationRequest {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            when: self.when,
            layout: self.layout,
            guest_type: self.guest_type,
            is_public: self.is_public,
        }
    }

    /// Turn an approved request into a confirmed event with no tickets sold
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            when: self.when,
            duration_hours: self.duration_hours,
            layout: self.layout,
            guest_type: self.guest_type,
            is_public: self.is_public,
            price_per_ticket: self.price_per_ticket,
            capacity: EVENT_CAPACITY,
            payment: self.payment,
            organizer: self.requester,
            tickets: Vec::new(),
            waitlist: VecDeque::new(),
        }
    }
}

impl fmt::Display for ReservationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} event on {} for {} hours, with layout {}",
            capitalized_visibility(self.is_public),
            self.when,
            self.duration_hours,
            self.layout
        )
    }
}

/// An admission to a confirmed event
///
/// Tickets compare equal when they admit the same holder to the same event,
/// regardless of how they were paid for.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub holder: Username,
    pub event: EventId,
    /// `None` for tickets minted by waitlist promotion or loaded from disk
    pub payment: Option<Payment>,
}

impl PartialEq for Ticket {
    fn eq(&self, other: &Self) -> bool {
        self.holder == other.holder && self.event == other.event
    }
}

impl Eq for Ticket {}

/// A confirmed event on the facility schedule
#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub when: TimeValue,
    pub duration_hours: u32,
    pub layout: Layout,
    pub guest_type: GuestType,
    pub is_public: bool,
    pub price_per_ticket: Decimal,
    pub capacity: usize,
    pub payment: Payment,
    pub organizer: Username,
    tickets: Vec<Ticket>,
    waitlist: VecDeque<Username>,
}

impl Event {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            when: self.when,
            layout: self.layout,
            guest_type: self.guest_type,
            is_public: self.is_public,
        }
    }

    /// Tickets in the order they were issued
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Waitlisted usernames, front of the queue first
    pub fn waitlist(&self) -> impl Iterator<Item = &str> {
        self.waitlist.iter().map(String::as_str)
    }

    pub fn waitlist_len(&self) -> usize {
        self.waitlist.len()
    }

    pub fn is_sold_out(&self) -> bool {
        self.tickets.len() >= self.capacity
    }

    pub fn holds_ticket(&self, username: &str) -> bool {
        self.tickets.iter().any(|t| t.holder == username)
    }

    pub fn is_waitlisted(&self, username: &str) -> bool {
        self.waitlist.iter().any(|u| u == username)
    }

    pub fn add_ticket(&mut self, ticket: Ticket) {
        self.tickets.push(ticket);
    }

    /// Remove and return `username`'s ticket, if they hold one
    pub fn remove_ticket(&mut self, username: &str) -> Option<Ticket> {
        let index = self.tickets.iter().position(|t| t.holder == username)?;
        Some(self.tickets.remove(index))
    }

    /// Queue a citizen, returning their 1-based position
    pub fn add_to_waitlist(&mut self, username: &str) -> usize {
        self.waitlist.push_back(username.to_string());
        self.waitlist.len()
    }

    pub fn pop_waitlist(&mut self) -> Option<Username> {
        self.waitlist.pop_front()
    }

    /// Restore unpaid tickets for the given holders, in order
    pub fn load_ticket_holders<I, S>(&mut self, holders: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Username>,
    {
        for holder in holders {
            self.tickets.push(Ticket {
                holder: holder.into(),
                event: self.id,
                payment: None,
            });
        }
    }

    /// Restore the waitlist, front of the queue first
    pub fn load_waitlist<I, S>(&mut self, usernames: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<Username>,
    {
        self.waitlist.extend(usernames.into_iter().map(Into::into));
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} event on {} for {} hours, with layout {}, price per ticket: ${}",
            capitalized_visibility(self.is_public),
            self.when,
            self.duration_hours,
            self.layout,
            self.price_per_ticket
        )?;
        writeln!(f, "- Organizer: {}", self.organizer)?;
        let attendees: Vec<&str> = self.tickets.iter().map(|t| t.holder.as_str()).collect();
        write!(f, "- Attendees: {}", attendees.join(", "))
    }
}

fn capitalized_visibility(is_public: bool) -> &'static str {
    if is_public {
        "Public"
    } else {
        "Private"
    }
}
