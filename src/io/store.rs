//! Data-directory persistence
//!
//! A [`DataStore`] loads a [`Facility`] from, and saves it to, four CSV files
//! in one directory:
//!
//! - `users.csv` - headerless `TYPE,username,password[,subtype]` rows
//! - `balances.csv` - `USERNAME,BALANCE`
//! - `confirmed_events.csv` - confirmed events with ticket holders and waitlist
//! - `pending_events.csv` - reservation requests awaiting approval
//!
//! Missing files load as empty. Malformed or inconsistent rows are logged and
//! skipped so one bad line never makes the rest of the data unreachable.
//! Booked hours are not stored; they are re-derived after loading.

use crate::core::{Facility, UserRegistry};
use crate::io::csv_format::{
    convert_balance_record, convert_event_record, convert_pending_record, parse_user_record,
    write_balances_csv, write_events_csv, write_pending_csv, write_users_csv, BalanceCsvRecord,
    EventCsvRecord, PendingCsvRecord,
};
use crate::io::record_reader::RecordReader;
use crate::types::{BookingError, Username};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const USERS_FILE: &str = "users.csv";
pub const BALANCES_FILE: &str = "balances.csv";
pub const CONFIRMED_FILE: &str = "confirmed_events.csv";
pub const PENDING_FILE: &str = "pending_events.csv";

/// Facility state stored as CSV files in one directory
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DataStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the whole facility
    ///
    /// # Arguments
    ///
    /// * `manager` - Facility manager username; defaults to the first
    ///   `FACILITY_MANAGER` row of `users.csv`
    ///
    /// # Errors
    ///
    /// - `ManagerNotFound` if no usable facility manager exists
    /// - `IoError` if an existing file cannot be opened
    pub fn load_facility(&self, manager: Option<&str>) -> Result<Facility, BookingError> {
        let mut users = self.load_users()?;
        self.load_balances(&mut users)?;

        let manager = match manager {
            Some(name) => name.to_string(),
            None => users
                .first_manager()
                .map(|user| user.username().to_string())
                .ok_or(BookingError::ManagerNotFound { username: None })?,
        };

        let mut facility = Facility::new(users, &manager)?;
        self.load_confirmed(&mut facility)?;
        self.load_pending(&mut facility)?;
        facility.derive_booked_hours();

        info!(
            dir = %self.dir.display(),
            users = facility.users().len(),
            confirmed = facility.confirmed_events().len(),
            pending = facility.pending_requests().len(),
            "facility loaded"
        );
        Ok(facility)
    }

    /// Write every file, replacing what was there
    ///
    /// Each file is written to a temporary sibling first and then renamed
    /// into place.
    pub fn save(&self, facility: &Facility) -> Result<(), BookingError> {
        fs::create_dir_all(&self.dir)?;

        self.write_file(USERS_FILE, |out| {
            write_users_csv(facility.users().iter(), out)
        })?;
        self.write_file(BALANCES_FILE, |out| {
            write_balances_csv(facility.users().iter(), out)
        })?;
        self.write_file(CONFIRMED_FILE, |out| {
            write_events_csv(facility.confirmed_events(), out)
        })?;
        self.write_file(PENDING_FILE, |out| {
            write_pending_csv(facility.pending_requests(), out)
        })?;

        debug!(dir = %self.dir.display(), "facility saved");
        Ok(())
    }

    fn load_users(&self) -> Result<UserRegistry, BookingError> {
        let mut users = UserRegistry::new();
        let Some(reader) = self.open(USERS_FILE, false)? else {
            return Ok(users);
        };

        for result in reader {
            let (line, record) = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!(file = USERS_FILE, error = %e, "skipping unreadable row");
                    continue;
                }
            };
            let registered = in_line(line, parse_user_record(&record))
                .and_then(|user| in_line(line, users.register(user)));
            if let Err(e) = registered {
                warn!(file = USERS_FILE, error = %e, "skipping user");
            }
        }
        Ok(users)
    }

    fn load_balances(&self, users: &mut UserRegistry) -> Result<(), BookingError> {
        let Some(mut reader) = self.open(BALANCES_FILE, true)? else {
            return Ok(());
        };

        while let Some(result) = reader.next() {
            let applied = result.map_err(|e| e.to_string()).and_then(|(line, record)| {
                let (username, balance) = reader
                    .decode::<BalanceCsvRecord>(line, &record)
                    .map_err(|e| e.to_string())
                    .and_then(|row| in_line(line, convert_balance_record(row)))?;
                let user = users
                    .get_mut(&username)
                    .ok_or_else(|| format!("Line {}: unknown user '{}'", line, username))?;
                user.set_balance(balance);
                Ok(())
            });
            if let Err(e) = applied {
                warn!(file = BALANCES_FILE, error = %e, "skipping balance");
            }
        }
        Ok(())
    }

    fn load_confirmed(&self, facility: &mut Facility) -> Result<(), BookingError> {
        let Some(mut reader) = self.open(CONFIRMED_FILE, true)? else {
            return Ok(());
        };

        while let Some(result) = reader.next() {
            let added = result.map_err(|e| e.to_string()).and_then(|(line, record)| {
                let parsed = reader
                    .decode::<EventCsvRecord>(line, &record)
                    .map_err(|e| e.to_string())
                    .and_then(|row| in_line(line, convert_event_record(row)))?;
                require_known(facility, &parsed.booking.organizer, line)?;

                let id = facility.allocate_event_id();
                let mut event = parsed.booking.into_request(id).into_event(id);
                let holders = known_users(facility, parsed.ticket_holders, line);
                let holders = distinct(holders, &[], line);
                let waitlist = known_users(facility, parsed.waitlist, line);
                let waitlist = distinct(waitlist, &holders, line);
                event.load_ticket_holders(holders);
                event.load_waitlist(waitlist);
                in_line(line, facility.add_confirmed_event(event))
            });
            if let Err(e) = added {
                warn!(file = CONFIRMED_FILE, error = %e, "skipping event");
            }
        }
        Ok(())
    }

    fn load_pending(&self, facility: &mut Facility) -> Result<(), BookingError> {
        let Some(mut reader) = self.open(PENDING_FILE, true)? else {
            return Ok(());
        };

        while let Some(result) = reader.next() {
            let added = result.map_err(|e| e.to_string()).and_then(|(line, record)| {
                let booking = reader
                    .decode::<PendingCsvRecord>(line, &record)
                    .map_err(|e| e.to_string())
                    .and_then(|row| in_line(line, convert_pending_record(row)))?;
                require_known(facility, &booking.organizer, line)?;

                let id = facility.allocate_request_id();
                facility.add_pending_request(booking.into_request(id));
                Ok(())
            });
            if let Err(e) = added {
                warn!(file = PENDING_FILE, error = %e, "skipping request");
            }
        }
        Ok(())
    }

    /// Open a data file, or `None` if it does not exist yet
    fn open(&self, name: &str, has_headers: bool) -> Result<Option<RecordReader>, BookingError> {
        let path = self.dir.join(name);
        if !path.exists() {
            debug!(file = %path.display(), "data file missing, starting empty");
            return Ok(None);
        }
        RecordReader::open(&path, has_headers).map(Some)
    }

    fn write_file<F>(&self, name: &str, write: F) -> Result<(), BookingError>
    where
        F: FnOnce(&mut dyn Write) -> Result<(), String>,
    {
        let path = self.dir.join(name);
        let staging = self.dir.join(format!("{}.tmp", name));

        let mut out = BufWriter::new(File::create(&staging)?);
        write(&mut out).map_err(|message| BookingError::IoError { message })?;
        out.flush()?;
        drop(out);

        fs::rename(&staging, &path)?;
        Ok(())
    }
}

/// Prefix an error with the line it came from
fn in_line<T, E: std::fmt::Display>(line: u64, result: Result<T, E>) -> Result<T, String> {
    result.map_err(|e| format!("Line {}: {}", line, e))
}

fn require_known(facility: &Facility, username: &str, line: u64) -> Result<(), String> {
    if facility.users().contains(username) {
        Ok(())
    } else {
        Err(format!("Line {}: unknown organizer '{}'", line, username))
    }
}

/// Keep the first occurrence of each username, skipping any in `exclude`
fn distinct(usernames: Vec<Username>, exclude: &[Username], line: u64) -> Vec<Username> {
    let mut kept: Vec<Username> = Vec::with_capacity(usernames.len());
    for name in usernames {
        if kept.contains(&name) || exclude.contains(&name) {
            warn!(file = CONFIRMED_FILE, line, username = %name, "dropping repeated attendee");
        } else {
            kept.push(name);
        }
    }
    kept
}

/// Drop usernames with no user record, logging each one
fn known_users(facility: &Facility, usernames: Vec<Username>, line: u64) -> Vec<Username> {
    usernames
        .into_iter()
        .filter(|name| {
            let known = facility.users().contains(name);
            if !known {
                warn!(file = CONFIRMED_FILE, line, username = %name, "dropping unknown attendee");
            }
            known
        })
        .collect()
}
