//! Ratings and money over a person's trip history.
//!
//! Only completed trips (with an `end_time`) count. A completed trip missing
//! the figure being aggregated is reported, not skipped.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::domain::{Person, Trip, UserId};
use crate::error::MetricsError;
use crate::registry::Registry;

/// Deducted from every fare before the driver's share is taken.
pub const PLATFORM_FEE: Decimal = dec!(1.65);

/// Driver's share of a fare after the platform fee.
pub const DRIVER_SHARE: Decimal = dec!(0.8);

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn completed<'a>(trips: impl IntoIterator<Item = &'a Trip>) -> impl Iterator<Item = &'a Trip> {
    trips.into_iter().filter(|trip| trip.is_completed())
}

fn cost_of(trip: &Trip) -> Result<Decimal, MetricsError> {
    trip.cost().ok_or(MetricsError::IncompleteTrip { trip_id: trip.id(), missing: "cost" })
}

/// Mean rating, or `0.0` with nothing to average.
pub fn average_rating<'a>(
    driven_trips: impl IntoIterator<Item = &'a Trip>,
) -> Result<f64, MetricsError> {
    let ratings = completed(driven_trips)
        .map(|trip| {
            trip.rating()
                .ok_or(MetricsError::IncompleteTrip { trip_id: trip.id(), missing: "rating" })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if ratings.is_empty() {
        return Ok(0.0);
    }
    let sum: u32 = ratings.iter().map(|&r| u32::from(r)).sum();
    Ok(f64::from(sum) / ratings.len() as f64)
}

fn gross_revenue<'a>(
    driven_trips: impl IntoIterator<Item = &'a Trip>,
) -> Result<Decimal, MetricsError> {
    completed(driven_trips).try_fold(Decimal::ZERO, |total, trip| {
        cost_of(trip)?
            .checked_sub(PLATFORM_FEE)
            .and_then(|net| net.checked_mul(DRIVER_SHARE))
            .and_then(|share| total.checked_add(share))
            .ok_or(MetricsError::Overflow { trip_id: trip.id() })
    })
}

fn gross_spending<'a>(
    passenger_trips: impl IntoIterator<Item = &'a Trip>,
) -> Result<Decimal, MetricsError> {
    completed(passenger_trips).try_fold(Decimal::ZERO, |total, trip| {
        total
            .checked_add(cost_of(trip)?)
            .ok_or(MetricsError::Overflow { trip_id: trip.id() })
    })
}

/// Sum over driven trips of `(cost - 1.65) * 0.8`, in cents.
pub fn total_revenue<'a>(
    driven_trips: impl IntoIterator<Item = &'a Trip>,
) -> Result<Decimal, MetricsError> {
    gross_revenue(driven_trips).map(to_cents)
}

/// What a person paid as a passenger minus what they earned driving, in
/// cents. Negative when driving earned more than riding cost.
pub fn net_expenditures<'a, 'b>(
    passenger_trips: impl IntoIterator<Item = &'a Trip>,
    driven_trips: impl IntoIterator<Item = &'b Trip>,
) -> Result<Decimal, MetricsError> {
    let spent = gross_spending(passenger_trips)?;
    let earned = gross_revenue(driven_trips)?;
    spent.checked_sub(earned).map(to_cents).ok_or(MetricsError::NetOverflow)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverStats {
    pub driver_id: UserId,
    pub driven_trip_count: usize,
    pub average_rating: f64,
    pub total_revenue: Decimal,
}

/// Rating and revenue for one driver in the registry.
pub fn driver_stats(registry: &Registry, driver_id: UserId) -> Result<DriverStats, MetricsError> {
    let driver = registry
        .find_driver(driver_id)
        .map_err(|_| MetricsError::InvalidId(driver_id))?
        .ok_or(MetricsError::UnknownDriver(driver_id))?;
    let driven = registry.resolve_trips(driver.driven_trips())?;

    Ok(DriverStats {
        driver_id: driver.id(),
        driven_trip_count: driven.len(),
        average_rating: average_rating(driven.iter().copied())?,
        total_revenue: total_revenue(driven.iter().copied())?,
    })
}

/// Net expenditures of a user; their driving revenue is netted off when the
/// user is also a driver.
pub fn user_net_expenditures(
    registry: &Registry,
    user_id: UserId,
) -> Result<Decimal, MetricsError> {
    let user = registry
        .find_user(user_id)
        .map_err(|_| MetricsError::InvalidId(user_id))?
        .ok_or(MetricsError::UnknownUser(user_id))?;
    let passenger_trips = registry.resolve_trips(user.trips())?;

    match registry.find_driver(user_id).ok().flatten() {
        Some(driver) => {
            net_expenditures(passenger_trips, registry.resolve_trips(driver.driven_trips())?)
        }
        None => net_expenditures(passenger_trips, std::iter::empty()),
    }
}
