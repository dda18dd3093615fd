//! User registry module
//!
//! This module provides the `UserRegistry` struct, the single store of every
//! registered user and their running balances.
//!
//! The UserRegistry is responsible for:
//! - Registering users and rejecting malformed or duplicate usernames
//! - Authenticating username and password pairs
//! - Crediting and debiting balances with checked arithmetic
//! - Applying multi-user ledger postings atomically

use crate::types::{BookingError, Role, User, LIST_SEPARATOR};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// One leg of a ledger posting: a signed balance change for one user
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub username: String,
    pub delta: Decimal,
}

impl Posting {
    /// Credit `amount` to `username`
    pub fn credit(username: &str, amount: Decimal) -> Self {
        Posting {
            username: username.to_string(),
            delta: amount,
        }
    }

    /// Debit `amount` from `username`
    pub fn debit(username: &str, amount: Decimal) -> Self {
        Posting {
            username: username.to_string(),
            delta: -amount,
        }
    }
}

/// Manages all registered users
///
/// Users are kept in a map keyed by username, plus a registration-order list
/// so listings and saved files stay deterministic.
#[derive(Debug, Default)]
pub struct UserRegistry {
    users: HashMap<String, User>,
    order: Vec<String>,
}

impl UserRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        UserRegistry {
            users: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a new user
    ///
    /// # Errors
    ///
    /// - `InvalidUsername` if the name is empty, has leading or trailing
    ///   whitespace, or contains the attendee list separator
    /// - `DuplicateUser` if the username is already taken
    pub fn register(&mut self, user: User) -> Result<(), BookingError> {
        let name = user.username();
        if name.is_empty() || name.trim() != name || name.contains(LIST_SEPARATOR) {
            return Err(BookingError::InvalidUsername {
                username: name.to_string(),
            });
        }
        if self.users.contains_key(user.username()) {
            return Err(BookingError::DuplicateUser {
                username: user.username().to_string(),
            });
        }
        self.order.push(user.username().to_string());
        self.users.insert(user.username().to_string(), user);
        Ok(())
    }

    pub fn get(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn get_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.get_mut(username)
    }

    /// Look up a user, failing with `UserNotFound`
    pub fn require(&self, username: &str) -> Result<&User, BookingError> {
        self.users
            .get(username)
            .ok_or_else(|| BookingError::user_not_found(username))
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Check a username and password pair
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&User, BookingError> {
        match self.users.get(username) {
            Some(user) if user.password() == password => Ok(user),
            _ => Err(BookingError::InvalidCredentials {
                username: username.to_string(),
            }),
        }
    }

    /// Users in registration order
    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.order.iter().filter_map(|name| self.users.get(name))
    }

    /// The first registered facility manager, if any
    pub fn first_manager(&self) -> Option<&User> {
        self.iter().find(|user| user.role() == Role::FacilityManager)
    }

    /// Credit a user's balance
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no such user exists
    /// - `ArithmeticOverflow` if the new balance does not fit
    pub fn add_to_balance(&mut self, username: &str, amount: Decimal) -> Result<(), BookingError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| BookingError::user_not_found(username))?;

        let new_balance = user
            .balance()
            .checked_add(amount)
            .ok_or_else(|| BookingError::arithmetic_overflow("credit", username))?;

        user.set_balance(new_balance);
        Ok(())
    }

    /// Debit a user's balance
    ///
    /// Balances may go negative; the manager pays refunds out of revenue that
    /// may already have been claimed.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no such user exists
    /// - `ArithmeticOverflow` if the new balance does not fit
    pub fn subtract_from_balance(
        &mut self,
        username: &str,
        amount: Decimal,
    ) -> Result<(), BookingError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| BookingError::user_not_found(username))?;

        let new_balance = user
            .balance()
            .checked_sub(amount)
            .ok_or_else(|| BookingError::arithmetic_overflow("debit", username))?;

        user.set_balance(new_balance);
        Ok(())
    }

    /// Pay out a positive balance, returning the amount claimed
    ///
    /// A zero or negative balance is left untouched and zero is returned.
    pub fn claim_balance(&mut self, username: &str) -> Result<Decimal, BookingError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| BookingError::user_not_found(username))?;

        let balance = user.balance();
        if balance <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        user.set_balance(Decimal::ZERO);
        Ok(balance)
    }

    /// Overwrite a user's booked-hours counter
    pub fn set_booked_hours(&mut self, username: &str, hours: u32) -> Result<(), BookingError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| BookingError::user_not_found(username))?;
        user.set_booked_hours(hours);
        Ok(())
    }

    /// Apply a set of balance changes all-or-nothing
    ///
    /// Every posting is checked against a scratch copy of the affected balances
    /// first; nothing is written unless all of them succeed.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if any posting names an unknown user
    /// - `ArithmeticOverflow` if any resulting balance does not fit
    pub fn post_all(&mut self, postings: &[Posting]) -> Result<(), BookingError> {
        let mut staged: HashMap<&str, Decimal> = HashMap::new();

        for posting in postings {
            let current = match staged.get(posting.username.as_str()) {
                Some(balance) => *balance,
                None => self.require(&posting.username)?.balance(),
            };
            let updated = current
                .checked_add(posting.delta)
                .ok_or_else(|| BookingError::arithmetic_overflow("posting", &posting.username))?;
            staged.insert(posting.username.as_str(), updated);
        }

        for (username, balance) in staged {
            if let Some(user) = self.users.get_mut(username) {
                user.set_balance(balance);
            }
        }
        Ok(())
    }
}
