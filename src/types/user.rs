//! Users and their roles
//!
//! A user's capabilities are decided by a closed [`Role`] enum, so facility
//! logic asks the role what it may do instead of testing concrete types.

use super::event::Layout;
use crate::core::policy;
use rust_decimal::Decimal;
use std::fmt;

/// Username, the unique identity key of a user
pub type Username = String;

/// Separator for usernames packed into one field
pub const LIST_SEPARATOR: &str = ";";

/// Whether a citizen lives in the community
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidentStatus {
    Resident,
    NonResident,
}

/// Institutional client category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    City,
    Organization,
}

/// What a user is allowed to do at the facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// An individual who can book events and buy tickets
    Citizen(ResidentStatus),
    /// An institution that can book events but not buy tickets
    Client(ClientKind),
    /// Approves requests and collects all facility revenue
    FacilityManager,
}

impl Role {
    /// Maximum hours this role may hold booked, or `None` if uncapped
    pub fn booking_cap(&self) -> Option<u32> {
        match self {
            Role::Citizen(_) => Some(policy::CITIZEN_HOUR_CAP),
            Role::Client(ClientKind::City) => Some(policy::CITY_HOUR_CAP),
            Role::Client(ClientKind::Organization) => Some(policy::ORGANIZATION_HOUR_CAP),
            Role::FacilityManager => None,
        }
    }

    /// Hourly room rate, or `None` for roles that cannot book
    pub fn hourly_rate(&self) -> Option<Decimal> {
        match self {
            Role::Citizen(ResidentStatus::Resident) => Some(Decimal::from(10)),
            Role::Citizen(ResidentStatus::NonResident) => Some(Decimal::from(15)),
            Role::Client(ClientKind::City) => Some(Decimal::from(5)),
            Role::Client(ClientKind::Organization) => Some(Decimal::from(20)),
            Role::FacilityManager => None,
        }
    }

    /// Would `booked + additional` hours exceed this role's cap?
    pub fn has_overbooked(&self, booked: u32, additional: u32) -> bool {
        policy::exceeds_cap(booked, additional, self.booking_cap())
    }

    /// Resident status for citizens, `None` for everyone else
    pub fn resident_status(&self) -> Option<ResidentStatus> {
        match self {
            Role::Citizen(status) => Some(*status),
            _ => None,
        }
    }

    /// Clients are not offered the wedding layout
    pub fn permits_layout(&self, layout: Layout) -> bool {
        !matches!((self, layout), (Role::Client(_), Layout::Wedding))
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Role::FacilityManager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Citizen(ResidentStatus::Resident) => "resident citizen",
            Role::Citizen(ResidentStatus::NonResident) => "non-resident citizen",
            Role::Client(ClientKind::City) => "city client",
            Role::Client(ClientKind::Organization) => "organization client",
            Role::FacilityManager => "facility manager",
        };
        f.write_str(label)
    }
}

/// A registered user
///
/// Tickets and organized events are not stored here; the facility owns them
/// and derives per-user views on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    username: Username,
    password: String,
    role: Role,
    balance: Decimal,
    booked_hours: u32,
}

impl User {
    /// Create a user with a zero balance and no booked hours
    pub fn new(username: &str, password: &str, role: Role) -> Self {
        User {
            username: username.to_string(),
            password: password.to_string(),
            role,
            balance: Decimal::ZERO,
            booked_hours: 0,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Running ledger balance (refunds owed to a citizen, revenue for the manager)
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub(crate) fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }

    pub fn booked_hours(&self) -> u32 {
        self.booked_hours
    }

    pub fn set_booked_hours(&mut self, booked_hours: u32) {
        self.booked_hours = booked_hours;
    }

    /// Would booking `hours` more push this user past their cap?
    pub fn has_overbooked(&self, hours: u32) -> bool {
        self.role.has_overbooked(self.booked_hours, hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::resident_under(Role::Citizen(ResidentStatus::Resident), 22, 2, false)]
    #[case::resident_over(Role::Citizen(ResidentStatus::Resident), 23, 2, true)]
    #[case::non_resident_over(Role::Citizen(ResidentStatus::NonResident), 0, 25, true)]
    #[case::city_at_cap(Role::Client(ClientKind::City), 46, 2, false)]
    #[case::city_over(Role::Client(ClientKind::City), 47, 2, true)]
    #[case::organization_at_cap(Role::Client(ClientKind::Organization), 34, 2, false)]
    #[case::organization_over(Role::Client(ClientKind::Organization), 35, 2, true)]
    #[case::manager_never(Role::FacilityManager, 1000, 1000, false)]
    fn test_has_overbooked(
        #[case] role: Role,
        #[case] booked: u32,
        #[case] additional: u32,
        #[case] expected: bool,
    ) {
        let mut user = User::new("someone", "pw", role);
        user.set_booked_hours(booked);
        assert_eq!(user.has_overbooked(additional), expected);
    }

    #[rstest]
    #[case(Role::Citizen(ResidentStatus::Resident), Some(10))]
    #[case(Role::Citizen(ResidentStatus::NonResident), Some(15))]
    #[case(Role::Client(ClientKind::City), Some(5))]
    #[case(Role::Client(ClientKind::Organization), Some(20))]
    #[case(Role::FacilityManager, None)]
    fn test_hourly_rates(#[case] role: Role, #[case] expected: Option<i64>) {
        assert_eq!(role.hourly_rate(), expected.map(Decimal::from));
    }

    #[test]
    fn test_clients_cannot_book_weddings() {
        assert!(!Role::Client(ClientKind::City).permits_layout(Layout::Wedding));
        assert!(Role::Client(ClientKind::City).permits_layout(Layout::Meeting));
        assert!(Role::Citizen(ResidentStatus::Resident).permits_layout(Layout::Wedding));
    }

    #[test]
    fn test_new_user_starts_empty() {
        let user = User::new("alice", "secret", Role::Citizen(ResidentStatus::Resident));
        assert_eq!(user.username(), "alice");
        assert_eq!(user.password(), "secret");
        assert_eq!(user.balance(), Decimal::ZERO);
        assert_eq!(user.booked_hours(), 0);
        assert_eq!(user.role().resident_status(), Some(ResidentStatus::Resident));
    }
}
