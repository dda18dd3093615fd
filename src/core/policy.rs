//! Pricing, overbooking and refund rules
//!
//! Pure functions with no access to facility state. The facility looks up the
//! inputs (rates, caps, elapsed hours) and applies the results.

use rust_decimal::Decimal;

/// Booked-hour cap for resident and non-resident citizens
pub const CITIZEN_HOUR_CAP: u32 = 24;

/// Booked-hour cap for city clients
pub const CITY_HOUR_CAP: u32 = 48;

/// Booked-hour cap for organization clients
pub const ORGANIZATION_HOUR_CAP: u32 = 36;

/// Flat charge added to every reservation and withheld from cancellation refunds
pub const SERVICE_CHARGE: Decimal = Decimal::TEN;

/// Cancellations more than this many hours ahead keep all but the service charge
pub const WEEK_HOURS: i64 = 168;

/// Cancellations more than this many hours ahead are refunded at 99%
pub const DAY_HOURS: i64 = 24;

/// Cost of booking the facility for `duration_hours` at `hourly_rate`
///
/// Returns `None` if the computation overflows.
///
/// # Examples
///
/// ```
/// use community_center::core::policy::event_cost;
/// use rust_decimal::Decimal;
///
/// assert_eq!(event_cost(Decimal::from(10), 2), Some(Decimal::from(30)));
/// ```
pub fn event_cost(hourly_rate: Decimal, duration_hours: u32) -> Option<Decimal> {
    hourly_rate
        .checked_mul(Decimal::from(duration_hours))?
        .checked_add(SERVICE_CHARGE)
}

/// Would `booked + additional` hours exceed `cap`? An absent cap never does.
pub fn exceeds_cap(booked: u32, additional: u32, cap: Option<u32>) -> bool {
    match cap {
        Some(cap) => u64::from(booked) + u64::from(additional) > u64::from(cap),
        None => false,
    }
}

/// Organizer refund for cancelling an event `hours_until_event` hours ahead
///
/// - more than a week ahead: everything except the service charge
/// - more than a day ahead: 99% of that, rounded to cents
/// - otherwise: nothing
///
/// The refund is never negative.
pub fn cancellation_refund(amount_paid: Decimal, hours_until_event: i64) -> Decimal {
    let refundable = (amount_paid - SERVICE_CHARGE).max(Decimal::ZERO);
    if hours_until_event > WEEK_HOURS {
        refundable
    } else if hours_until_event > DAY_HOURS {
        (refundable * Decimal::new(99, 2)).round_dp(2)
    } else {
        Decimal::ZERO
    }
}
