//! CSV format handling for the facility's data files
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for the confirmed, pending and balance files
//! - Parsing of the headerless, variable-width user rows
//! - Conversion between CSV records and domain types
//! - Writers for each file
//!
//! All functions are pure (no file system access) for easy testing.

use crate::types::event::{parse_visibility, visibility_str};
use crate::types::{
    CardDetails, ClientKind, Event, GuestType, Layout, Payment, RequestId, ReservationRequest,
    ResidentStatus, Role, TimeValue, User, Username, LIST_SEPARATOR,
};
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Header of `confirmed_events.csv`
pub const EVENT_HEADER: [&str; 14] = [
    "DATE",
    "TIME",
    "LAYOUT",
    "GUEST_TYPE",
    "IS_PUBLIC",
    "PRICE",
    "DURATION",
    "PAYMENT_AMOUNT",
    "CC",
    "CVV",
    "EXPIRY",
    "ORGANIZER",
    "TICKETS",
    "WAITLIST",
];

/// Header of `pending_events.csv`
pub const PENDING_HEADER: [&str; 12] = [
    "DATE",
    "TIME",
    "LAYOUT",
    "GUEST_TYPE",
    "IS_PUBLIC",
    "PRICE",
    "DURATION",
    "PAYMENT_AMOUNT",
    "CC",
    "CVV",
    "EXPIRY",
    "ORGANIZER",
];

/// Header of `balances.csv`
pub const BALANCE_HEADER: [&str; 2] = ["USERNAME", "BALANCE"];

/// One row of `confirmed_events.csv`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EventCsvRecord {
    pub date: String,
    pub time: String,
    pub layout: String,
    pub guest_type: String,
    pub is_public: String,
    pub price: String,
    pub duration: String,
    pub payment_amount: String,
    pub cc: String,
    pub cvv: String,
    pub expiry: String,
    pub organizer: String,
    #[serde(default)]
    pub tickets: String,
    #[serde(default)]
    pub waitlist: String,
}

/// One row of `pending_events.csv`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PendingCsvRecord {
    pub date: String,
    pub time: String,
    pub layout: String,
    pub guest_type: String,
    pub is_public: String,
    pub price: String,
    pub duration: String,
    pub payment_amount: String,
    pub cc: String,
    pub cvv: String,
    pub expiry: String,
    pub organizer: String,
}

/// One row of `balances.csv`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BalanceCsvRecord {
    pub username: String,
    pub balance: String,
}

/// A booking read back from disk, not yet given an id
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBooking {
    pub when: TimeValue,
    pub duration_hours: u32,
    pub layout: Layout,
    pub guest_type: GuestType,
    pub is_public: bool,
    pub price_per_ticket: Decimal,
    pub payment: Payment,
    pub organizer: Username,
}

impl ParsedBooking {
    /// Rebuild the reservation request this booking was saved from
    pub fn into_request(self, id: RequestId) -> ReservationRequest {
        ReservationRequest {
            id,
            requester: self.organizer,
            when: self.when,
            duration_hours: self.duration_hours,
            layout: self.layout,
            guest_type: self.guest_type,
            is_public: self.is_public,
            price_per_ticket: self.price_per_ticket,
            payment: self.payment,
        }
    }
}

/// A confirmed event read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    pub booking: ParsedBooking,
    pub ticket_holders: Vec<Username>,
    pub waitlist: Vec<Username>,
}

/// Parse a headerless user row: `TYPE,username,password[,subtype]`
///
/// # Returns
///
/// Result containing either:
/// - Ok(User) - The user, with a zero balance and no booked hours
/// - Err(String) - Error message describing the conversion failure
pub fn parse_user_record(record: &StringRecord) -> Result<User, String> {
    let field = |index: usize| record.get(index).map(str::trim).unwrap_or("");

    let kind = field(0);
    let username = field(1);
    let password = field(2);
    if username.is_empty() {
        return Err("User record is missing a username".to_string());
    }

    let role = match (kind, field(3)) {
        ("FACILITY_MANAGER", _) => Role::FacilityManager,
        ("CITIZEN", "RESIDENT") => Role::Citizen(ResidentStatus::Resident),
        ("CITIZEN", "NON_RESIDENT") | ("CITIZEN", "NONRESIDENT") => {
            Role::Citizen(ResidentStatus::NonResident)
        }
        ("CLIENT", "CITY") => Role::Client(ClientKind::City),
        ("CLIENT", "ORGANIZATION") => Role::Client(ClientKind::Organization),
        (kind, subtype) => {
            return Err(format!(
                "Invalid user type '{}' / '{}' for user {}",
                kind, subtype, username
            ))
        }
    };

    Ok(User::new(username, password, role))
}

/// Fields of the headerless user row for `user`
pub fn user_record_fields(user: &User) -> Vec<String> {
    let mut fields = Vec::with_capacity(4);
    let (kind, subtype) = match user.role() {
        Role::FacilityManager => ("FACILITY_MANAGER", None),
        Role::Citizen(ResidentStatus::Resident) => ("CITIZEN", Some("RESIDENT")),
        Role::Citizen(ResidentStatus::NonResident) => ("CITIZEN", Some("NON_RESIDENT")),
        Role::Client(ClientKind::City) => ("CLIENT", Some("CITY")),
        Role::Client(ClientKind::Organization) => ("CLIENT", Some("ORGANIZATION")),
    };
    fields.push(kind.to_string());
    fields.push(user.username().to_string());
    fields.push(user.password().to_string());
    if let Some(subtype) = subtype {
        fields.push(subtype.to_string());
    }
    fields
}

/// Convert a pending-request row into a booking
pub fn convert_pending_record(record: PendingCsvRecord) -> Result<ParsedBooking, String> {
    parse_booking(BookingFields {
        date: &record.date,
        time: &record.time,
        layout: &record.layout,
        guest_type: &record.guest_type,
        is_public: &record.is_public,
        price: &record.price,
        duration: &record.duration,
        payment_amount: &record.payment_amount,
        cc: &record.cc,
        cvv: &record.cvv,
        expiry: &record.expiry,
        organizer: &record.organizer,
    })
}

/// Convert a confirmed-event row into a booking plus its ticket holders and waitlist
pub fn convert_event_record(record: EventCsvRecord) -> Result<ParsedEvent, String> {
    let booking = parse_booking(BookingFields {
        date: &record.date,
        time: &record.time,
        layout: &record.layout,
        guest_type: &record.guest_type,
        is_public: &record.is_public,
        price: &record.price,
        duration: &record.duration,
        payment_amount: &record.payment_amount,
        cc: &record.cc,
        cvv: &record.cvv,
        expiry: &record.expiry,
        organizer: &record.organizer,
    })?;

    Ok(ParsedEvent {
        booking,
        ticket_holders: split_list(&record.tickets),
        waitlist: split_list(&record.waitlist),
    })
}

/// Convert a balance row into a username and amount
pub fn convert_balance_record(record: BalanceCsvRecord) -> Result<(Username, Decimal), String> {
    let username = record.username.trim();
    if username.is_empty() {
        return Err("Balance record is missing a username".to_string());
    }
    let balance = Decimal::from_str(record.balance.trim())
        .map_err(|_| format!("Invalid balance '{}' for {}", record.balance, username))?;
    Ok((username.to_string(), balance))
}

/// Row for a confirmed event
pub fn event_to_record(event: &Event) -> EventCsvRecord {
    let holders: Vec<&str> = event.tickets().iter().map(|t| t.holder.as_str()).collect();
    let waitlist: Vec<&str> = event.waitlist().collect();
    let card = event.payment.card();

    EventCsvRecord {
        date: event.when.date_str(),
        time: event.when.time_str(),
        layout: event.layout.as_str().to_string(),
        guest_type: event.guest_type.as_str().to_string(),
        is_public: visibility_str(event.is_public).to_string(),
        price: event.price_per_ticket.to_string(),
        duration: event.duration_hours.to_string(),
        payment_amount: event.payment.amount().to_string(),
        cc: card.card_number().to_string(),
        cvv: card.cvv().to_string(),
        expiry: card.expiry().to_string(),
        organizer: event.organizer.clone(),
        tickets: holders.join(LIST_SEPARATOR),
        waitlist: waitlist.join(LIST_SEPARATOR),
    }
}

/// Row for a pending request
pub fn request_to_record(request: &ReservationRequest) -> PendingCsvRecord {
    let card = request.payment.card();

    PendingCsvRecord {
        date: request.when.date_str(),
        time: request.when.time_str(),
        layout: request.layout.as_str().to_string(),
        guest_type: request.guest_type.as_str().to_string(),
        is_public: visibility_str(request.is_public).to_string(),
        price: request.price_per_ticket.to_string(),
        duration: request.duration_hours.to_string(),
        payment_amount: request.payment.amount().to_string(),
        cc: card.card_number().to_string(),
        cvv: card.cvv().to_string(),
        expiry: card.expiry().to_string(),
        organizer: request.requester.clone(),
    }
}

/// Write users in the headerless `users.csv` format
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_users_csv<'a, I>(users: I, output: &mut dyn Write) -> Result<(), String>
where
    I: IntoIterator<Item = &'a User>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(output);

    for user in users {
        writer
            .write_record(user_record_fields(user))
            .map_err(|e| format!("Failed to write user record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Write confirmed events in `confirmed_events.csv` format
pub fn write_events_csv(events: &[Event], output: &mut dyn Write) -> Result<(), String> {
    let records: Vec<EventCsvRecord> = events.iter().map(event_to_record).collect();
    write_with_header(&EVENT_HEADER, &records, output)
}

/// Write pending requests in `pending_events.csv` format
pub fn write_pending_csv(
    requests: &[ReservationRequest],
    output: &mut dyn Write,
) -> Result<(), String> {
    let records: Vec<PendingCsvRecord> = requests.iter().map(request_to_record).collect();
    write_with_header(&PENDING_HEADER, &records, output)
}

/// Write every user's balance in `balances.csv` format
pub fn write_balances_csv<'a, I>(users: I, output: &mut dyn Write) -> Result<(), String>
where
    I: IntoIterator<Item = &'a User>,
{
    let records: Vec<BalanceCsvRecord> = users
        .into_iter()
        .map(|user| BalanceCsvRecord {
            username: user.username().to_string(),
            balance: user.balance().to_string(),
        })
        .collect();
    write_with_header(&BALANCE_HEADER, &records, output)
}

fn write_with_header<R: Serialize>(
    header: &[&str],
    records: &[R],
    output: &mut dyn Write,
) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer
        .write_record(header)
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for record in records {
        writer
            .serialize(record)
            .map_err(|e| format!("Failed to write record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Raw booking columns shared by the confirmed and pending files
struct BookingFields<'a> {
    date: &'a str,
    time: &'a str,
    layout: &'a str,
    guest_type: &'a str,
    is_public: &'a str,
    price: &'a str,
    duration: &'a str,
    payment_amount: &'a str,
    cc: &'a str,
    cvv: &'a str,
    expiry: &'a str,
    organizer: &'a str,
}

fn parse_booking(fields: BookingFields<'_>) -> Result<ParsedBooking, String> {
    let when = TimeValue::parse(fields.date, fields.time).map_err(|e| e.to_string())?;
    let layout = Layout::from_str(fields.layout)?;
    let guest_type = GuestType::from_str(fields.guest_type)?;
    let is_public = parse_visibility(fields.is_public)?;

    let price_per_ticket = Decimal::from_str(fields.price.trim())
        .map_err(|_| format!("Invalid price '{}'", fields.price))?;
    let duration_hours: u32 = fields
        .duration
        .trim()
        .parse()
        .map_err(|_| format!("Invalid duration '{}'", fields.duration))?;
    let amount = Decimal::from_str(fields.payment_amount.trim())
        .map_err(|_| format!("Invalid payment amount '{}'", fields.payment_amount))?;
    let card = CardDetails::new(fields.cc, fields.cvv, fields.expiry).map_err(|e| e.to_string())?;

    let organizer = fields.organizer.trim();
    if organizer.is_empty() {
        return Err("Booking is missing an organizer".to_string());
    }

    Ok(ParsedBooking {
        when,
        duration_hours,
        layout,
        guest_type,
        is_public,
        price_per_ticket,
        payment: Payment::capture(amount, card),
        organizer: organizer.to_string(),
    })
}

fn split_list(field: &str) -> Vec<Username> {
    field
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
