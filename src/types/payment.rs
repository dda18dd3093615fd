//! Captured card payments
//!
//! Card data is validated when a [`CardDetails`] is built and stored as-is
//! once captured into a [`Payment`]. No payment network is contacted.

use super::error::BookingError;
use rust_decimal::Decimal;
use std::fmt;

/// Expiries must be later than this (month, two-digit year)
const EARLIEST_EXPIRY: (u8, u8) = (5, 24);

/// Card expiry month and two-digit year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    month: u8,
    year: u8,
}

impl CardExpiry {
    /// Parse an `MM/YY` expiry, rejecting anything not later than 05/24
    pub fn parse(input: &str) -> Result<Self, BookingError> {
        let invalid = || BookingError::InvalidExpiry {
            input: input.to_string(),
        };

        let trimmed = input.trim();
        let (month, year) = match trimmed.split_once('/') {
            Some((m, y)) if m.len() == 2 && y.len() == 2 => (m, y),
            _ => return Err(invalid()),
        };
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let year: u8 = year.parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        if (year, month) <= (EARLIEST_EXPIRY.1, EARLIEST_EXPIRY.0) {
            return Err(invalid());
        }

        Ok(CardExpiry { month, year })
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u8 {
        self.year
    }
}

impl fmt::Display for CardExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year)
    }
}

/// Validated card details, not yet bound to an amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    card_number: String,
    cvv: u16,
    expiry: CardExpiry,
}

impl CardDetails {
    /// Validate raw card input
    ///
    /// # Errors
    ///
    /// - `InvalidCardNumber` unless the number is 16 digits without a leading zero
    /// - `InvalidCvv` unless the CVV is 3 digits without a leading zero
    /// - `InvalidExpiry` unless the expiry is `MM/YY` and later than 05/24
    pub fn new(card_number: &str, cvv: &str, expiry: &str) -> Result<Self, BookingError> {
        let card_number = card_number.trim();
        if card_number.len() != 16
            || !card_number.bytes().all(|b| b.is_ascii_digit())
            || card_number.starts_with('0')
        {
            return Err(BookingError::InvalidCardNumber);
        }

        let cvv_value: u16 = cvv.trim().parse().map_err(|_| BookingError::InvalidCvv {
            input: cvv.to_string(),
        })?;
        if !(100..=999).contains(&cvv_value) {
            return Err(BookingError::InvalidCvv {
                input: cvv.to_string(),
            });
        }

        Ok(CardDetails {
            card_number: card_number.to_string(),
            cvv: cvv_value,
            expiry: CardExpiry::parse(expiry)?,
        })
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn cvv(&self) -> u16 {
        self.cvv
    }

    pub fn expiry(&self) -> CardExpiry {
        self.expiry
    }

    /// Last four digits, safe to log
    pub fn last_four(&self) -> &str {
        &self.card_number[self.card_number.len() - 4..]
    }
}

/// A captured card authorization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    amount: Decimal,
    card: CardDetails,
}

impl Payment {
    /// Capture `amount` against the given card
    pub fn capture(amount: Decimal, card: CardDetails) -> Self {
        Payment { amount, card }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn card(&self) -> &CardDetails {
        &self.card
    }
}
