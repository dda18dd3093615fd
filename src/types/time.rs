//! Calendar date plus hour-of-day values
//!
//! The facility books in whole hours, so a [`TimeValue`] is a date and an hour
//! with no minutes. All comparisons use the combined (date, hour) ordering,
//! except [`TimeValue::is_same_day_or_after`], which looks at the date only.

use super::error::BookingError;
use chrono::NaiveDate;
use std::fmt;

/// First bookable hour of the day
pub const OPENING_HOUR: u8 = 8;

/// Hour at which the facility closes
pub const CLOSING_HOUR: u8 = 23;

const DATE_FORMAT: &str = "%m/%d/%Y";

/// A calendar date and hour of day
///
/// Field order matters: the derived ordering compares the date first and the
/// hour second, which is the facility's single absolute time ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeValue {
    date: NaiveDate,
    hour: u8,
}

impl TimeValue {
    /// Create a time value, rejecting hours past 23
    pub fn new(date: NaiveDate, hour: u8) -> Result<Self, BookingError> {
        if hour > 23 {
            return Err(BookingError::InvalidTime {
                input: hour.to_string(),
            });
        }
        Ok(TimeValue { date, hour })
    }

    /// Parse a `MM/DD/YYYY` date and an hour (`9`, `09` or `09:00`)
    pub fn parse(date: &str, time: &str) -> Result<Self, BookingError> {
        TimeValue::new(parse_date(date)?, parse_hour(time)?)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// The date in `MM/DD/YYYY` form
    pub fn date_str(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// The time in `HH:00` form
    pub fn time_str(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    /// Is the hour within the facility's bookable hours (8 through 23)?
    pub fn is_within_operating_hours(&self) -> bool {
        (OPENING_HOUR..=CLOSING_HOUR).contains(&self.hour)
    }

    /// Signed number of whole hours from `other` to `self`
    ///
    /// Positive when `self` is later than `other`.
    pub fn hours_difference(&self, other: &TimeValue) -> i64 {
        let days = (self.date - other.date).num_days();
        days * 24 + i64::from(self.hour) - i64::from(other.hour)
    }

    /// Hours left before the facility closes at 23:00
    pub fn hours_until_close(&self) -> u32 {
        u32::from(CLOSING_HOUR.saturating_sub(self.hour))
    }

    /// Is this on the same calendar day as `other`, or any later day?
    pub fn is_same_day_or_after(&self, other: &TimeValue) -> bool {
        self.date >= other.date
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.date_str(), self.time_str())
    }
}

/// Parse a `MM/DD/YYYY` date string
pub fn parse_date(input: &str) -> Result<NaiveDate, BookingError> {
    let trimmed = input.trim();
    // chrono accepts single-digit months and days, the stored format does not
    if trimmed.len() != 10 {
        return Err(BookingError::InvalidDate {
            input: input.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| BookingError::InvalidDate {
        input: input.to_string(),
    })
}

/// Parse an hour given as `9`, `09` or `09:00`
pub fn parse_hour(input: &str) -> Result<u8, BookingError> {
    let invalid = || BookingError::InvalidTime {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let (hour_part, minute_part) = match trimmed.split_once(':') {
        Some((hour, minutes)) => (hour, Some(minutes)),
        None => (trimmed, None),
    };

    if let Some(minutes) = minute_part {
        if minutes != "00" {
            return Err(invalid());
        }
    }

    let hour: u8 = hour_part.parse().map_err(|_| invalid())?;
    if hour > 23 {
        return Err(invalid());
    }
    Ok(hour)
}
