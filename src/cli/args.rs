use crate::session::{Credentials, SessionConfig};
use crate::types::time::{parse_date, parse_hour};
use crate::types::{BookingError, ClientKind, GuestType, Layout, ResidentStatus, Role, TimeValue};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Book the community center, buy tickets and manage reservations
#[derive(Parser, Debug)]
#[command(name = "community-center")]
#[command(about = "Book the community center, buy tickets and manage reservations", long_about = None)]
pub struct CliArgs {
    /// Directory holding users.csv, balances.csv and the event files
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        env = "COMMUNITY_CENTER_DATA_DIR",
        default_value = "program_data"
    )]
    pub data_dir: PathBuf,

    /// Today's date, MM/DD/YYYY
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub date: NaiveDate,

    /// Current hour of the day (0-23)
    #[arg(long, value_name = "HOUR", value_parser = parse_hour)]
    pub hour: u8,

    /// Facility manager username (defaults to the first manager in users.csv)
    #[arg(long, value_name = "NAME", env = "COMMUNITY_CENTER_MANAGER")]
    pub manager: Option<String>,

    /// Username to log in as
    #[arg(long, value_name = "USERNAME", requires = "password")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(long, value_name = "PASSWORD", requires = "user")]
    pub password: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "FILTER", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// One facility operation
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List confirmed events from today onwards
    Schedule,

    /// Create a citizen or client account
    Register {
        username: String,
        password: String,
        #[arg(long, value_enum)]
        kind: AccountKind,
    },

    /// Request a reservation (charged immediately)
    RequestEvent {
        #[command(flatten)]
        slot: EventSlot,
        /// Length of the event in hours
        #[arg(long)]
        duration: u32,
        /// wedding, meeting, lecture or dance
        #[arg(long)]
        layout: Layout,
        /// residents, nonresidents or both
        #[arg(long = "guest-type", default_value = "both")]
        guest_type: GuestType,
        /// Hold a private event (no tickets are sold)
        #[arg(long)]
        private: bool,
        /// Ticket price for public events
        #[arg(long, default_value = "0")]
        price: Decimal,
        #[command(flatten)]
        card: CardArgs,
    },

    /// List pending reservation requests
    Pending,

    /// Approve a pending request (facility manager only)
    Approve { request_id: u32 },

    /// Reject a pending request and refund it (facility manager only)
    Reject { request_id: u32 },

    /// Cancel an event you organized
    CancelEvent {
        #[command(flatten)]
        slot: EventSlot,
    },

    /// Buy a ticket, or join the waitlist if the event is full
    BuyTicket {
        #[command(flatten)]
        slot: EventSlot,
        #[command(flatten)]
        card: CardArgs,
    },

    /// Refund a ticket
    RefundTicket {
        #[command(flatten)]
        slot: EventSlot,
    },

    /// List your tickets
    MyTickets,

    /// List the events and requests you organized
    MyEvents,

    /// Show your balance
    Balance,

    /// Pay out your positive balance
    ClaimBalance,
}

impl Command {
    /// Does this command change saved state?
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Command::Schedule
                | Command::Pending
                | Command::MyTickets
                | Command::MyEvents
                | Command::Balance
        )
    }
}

/// Date and starting hour identifying an event
#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct EventSlot {
    /// Event date, MM/DD/YYYY
    #[arg(long = "event-date", value_name = "DATE", value_parser = parse_date)]
    pub event_date: NaiveDate,

    /// Event starting hour (8-23)
    #[arg(long = "event-time", value_name = "HOUR", value_parser = parse_hour)]
    pub event_time: u8,
}

impl EventSlot {
    pub fn when(&self) -> Result<TimeValue, BookingError> {
        TimeValue::new(self.event_date, self.event_time)
    }
}

/// Card used to pay
#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct CardArgs {
    /// 16-digit card number
    #[arg(long = "card", value_name = "NUMBER")]
    pub number: String,

    #[arg(long, value_name = "CVV")]
    pub cvv: String,

    /// Expiration date, MM/YY
    #[arg(long, value_name = "MM/YY")]
    pub expiry: String,
}

/// Kind of account created by `register`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AccountKind {
    Resident,
    NonResident,
    City,
    Organization,
}

impl AccountKind {
    pub fn role(&self) -> Role {
        match self {
            AccountKind::Resident => Role::Citizen(ResidentStatus::Resident),
            AccountKind::NonResident => Role::Citizen(ResidentStatus::NonResident),
            AccountKind::City => Role::Client(ClientKind::City),
            AccountKind::Organization => Role::Client(ClientKind::Organization),
        }
    }
}

impl CliArgs {
    /// Session settings taken from the parsed arguments
    pub fn session_config(&self) -> Result<SessionConfig, BookingError> {
        Ok(SessionConfig {
            data_dir: self.data_dir.clone(),
            now: TimeValue::new(self.date, self.hour)?,
            manager: self.manager.clone(),
        })
    }

    /// Login details, if both --user and --password were given
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.user, &self.password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}
