use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{Driver, Person};
use crate::error::RegistryError;
use crate::registry::Registry;

/// Policy that picks one driver out of the eligible set.
///
/// `eligible` is already filtered to available drivers other than the rider,
/// in feed order, and is never empty.
pub trait DriverSelection: Send + Sync {
    fn select<'a>(
        &self,
        eligible: &[&'a Driver],
        registry: &Registry,
    ) -> Result<Option<&'a Driver>, RegistryError>;
}

/// Prefers a driver who has never driven, otherwise the driver whose most
/// recent trip ended longest ago. Ties go to the earlier driver in feed order.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdleLongest;

impl DriverSelection for IdleLongest {
    fn select<'a>(
        &self,
        eligible: &[&'a Driver],
        registry: &Registry,
    ) -> Result<Option<&'a Driver>, RegistryError> {
        if let Some(fresh) = eligible.iter().find(|driver| driver.driven_trips().is_empty()) {
            debug!(driver_id = fresh.id(), "Selected driver with no trips");
            return Ok(Some(*fresh));
        }

        let mut idle_longest: Option<(&'a Driver, DateTime<Utc>)> = None;
        for &driver in eligible {
            let Some(last_end) = last_trip_end(driver, registry)? else {
                continue;
            };
            // Strictly earlier only, so the first driver in feed order keeps a tie.
            if idle_longest.map_or(true, |(_, best)| last_end < best) {
                idle_longest = Some((driver, last_end));
            }
        }

        match idle_longest {
            Some((driver, last_end)) => {
                debug!(driver_id = driver.id(), %last_end, "Selected longest idle driver");
                Ok(Some(driver))
            }
            None => Ok(eligible.first().copied()),
        }
    }
}

/// Latest `end_time` among the driver's trips. Trips without an end time
/// never count as a driver's most recent trip.
fn last_trip_end(
    driver: &Driver,
    registry: &Registry,
) -> Result<Option<DateTime<Utc>>, RegistryError> {
    let trips = registry.resolve_trips(driver.driven_trips())?;
    Ok(trips.iter().filter_map(|trip| trip.end_time()).max())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{DriverRow, TripRow, UserRow};
    use crate::registry::fixtures::{day, trip};
    use rust_decimal_macros::dec;

    fn registry(drivers: &[i64], trips: Vec<TripRow>) -> Registry {
        let users = (1..=9)
            .map(|id| UserRow::new(id, format!("Person{id}"), ""))
            .collect::<Vec<_>>();
        let drivers = drivers
            .iter()
            .map(|&id| DriverRow::new(id, format!("{id}C9EVBRM0YBC564DZ"), None))
            .collect::<Vec<_>>();
        Registry::from_feeds(users, drivers, trips).unwrap()
    }

    fn pick(registry: &Registry) -> Option<i64> {
        let eligible: Vec<&Driver> = registry.drivers().iter().collect();
        IdleLongest.select(&eligible, registry).unwrap().map(|d| d.id())
    }

    #[test]
    fn prefers_driver_with_no_trips_regardless_of_order() {
        let r = registry(&[2, 3], vec![trip(1, 2, 9, 10, dec!(5), 5)]);
        assert_eq!(pick(&r), Some(3));

        let r = registry(&[3, 2], vec![trip(1, 2, 9, 10, dec!(5), 5)]);
        assert_eq!(pick(&r), Some(3));
    }

    #[test]
    fn picks_driver_whose_latest_trip_is_oldest() {
        let trips = vec![
            trip(1, 2, 9, 10, dec!(5), 5),
            trip(2, 2, 9, 20, dec!(5), 5),
            trip(3, 3, 9, 15, dec!(5), 5),
            trip(4, 4, 9, 18, dec!(5), 5),
        ];
        // Driver 2 drove first but most recently; driver 3 has been idle since the 15th.
        assert_eq!(pick(&registry(&[2, 3, 4], trips)), Some(3));
    }

    #[test]
    fn equal_latest_end_times_go_to_feed_order() {
        let trips = vec![trip(1, 4, 9, 12, dec!(5), 5), trip(2, 3, 9, 12, dec!(5), 5)];
        assert_eq!(pick(&registry(&[4, 3], trips)), Some(4));
    }

    #[test]
    fn unfinished_trips_are_ignored_for_recency() {
        let mut unfinished = trip(2, 3, 9, 25, dec!(5), 5);
        unfinished.end_time = None;
        unfinished.cost = None;
        unfinished.rating = None;
        unfinished.start_time = day(25);
        let trips = vec![trip(1, 3, 9, 11, dec!(5), 5), unfinished, trip(3, 4, 9, 14, dec!(5), 5)];
        assert_eq!(pick(&registry(&[4, 3], trips)), Some(3));
    }

    #[test]
    fn falls_back_to_first_when_nobody_has_finished_a_trip() {
        let mut unfinished = trip(1, 3, 9, 25, dec!(5), 5);
        unfinished.end_time = None;
        let r = registry(&[3], vec![unfinished]);
        assert_eq!(pick(&r), Some(3));
    }
}
