//! Id-indexed store of every user, driver and trip.
//!
//! The registry owns the canonical entities. Trips, users and drivers refer to
//! each other by id; [`Registry::commit_trip`] is the one place that links a
//! trip to its driver and passenger.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::domain::{
    check_id, Driver, DriverId, DriverStatus, Person, Trip, TripCreate, TripId, User, UserId,
};
use crate::error::RegistryError;
use crate::feed::{DriverRow, TripRow, UserRow};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    users: Vec<User>,
    drivers: Vec<Driver>,
    trips: Vec<Trip>,
    user_index: HashMap<UserId, usize>,
    driver_index: HashMap<DriverId, usize>,
    trip_index: HashMap<TripId, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the entity graph from the three feeds, users first.
    pub fn from_feeds(
        users: impl IntoIterator<Item = UserRow>,
        drivers: impl IntoIterator<Item = DriverRow>,
        trips: impl IntoIterator<Item = TripRow>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.load_users(users)?;
        registry.load_drivers(drivers)?;
        registry.load_trips(trips)?;
        debug!(%registry, "Registry loaded");
        Ok(registry)
    }

    pub fn load_users(
        &mut self,
        rows: impl IntoIterator<Item = UserRow>,
    ) -> Result<(), RegistryError> {
        for row in rows {
            let user = User::new(row.id, row.name, row.phone)?;
            if self.user_index.contains_key(&user.id()) {
                return Err(RegistryError::DuplicateUser(user.id()));
            }
            self.user_index.insert(user.id(), self.users.len());
            self.users.push(user);
        }
        Ok(())
    }

    /// Each driver row is merged with the user row of the same id.
    pub fn load_drivers(
        &mut self,
        rows: impl IntoIterator<Item = DriverRow>,
    ) -> Result<(), RegistryError> {
        for row in rows {
            let id = check_id(row.id)?;
            if self.driver_index.contains_key(&id) {
                return Err(RegistryError::DuplicateDriver(id));
            }
            let user = self
                .user_index
                .get(&id)
                .map(|&idx| self.users[idx].clone())
                .ok_or(RegistryError::MissingUserForDriver(id))?;
            let status = row
                .status
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<DriverStatus>)
                .transpose()?;

            let driver = Driver::new(user, row.vehicle_id, status)?;
            self.driver_index.insert(id, self.drivers.len());
            self.drivers.push(driver);
        }
        Ok(())
    }

    /// Resolves each trip's driver and passenger, then links the trip to both.
    pub fn load_trips(
        &mut self,
        rows: impl IntoIterator<Item = TripRow>,
    ) -> Result<(), RegistryError> {
        for row in rows {
            let trip_id = check_id(row.id)?;
            if self.find_driver(row.driver_id)?.is_none() {
                return Err(RegistryError::UnknownDriver { trip_id, driver_id: row.driver_id });
            }
            if self.find_user(row.passenger_id)?.is_none() {
                return Err(RegistryError::UnknownPassenger {
                    trip_id,
                    passenger_id: row.passenger_id,
                });
            }
            let trip = Trip::new(TripCreate {
                id: trip_id,
                driver: Some(row.driver_id),
                passenger: Some(row.passenger_id),
                start_time: row.start_time,
                end_time: row.end_time,
                cost: row.cost,
                rating: row.rating,
            })?;
            self.commit_trip(trip)?;
        }
        Ok(())
    }

    /// Adds `trip` to the trip collection and appends it to its passenger's
    /// `trips` and its driver's `driven_trips`.
    ///
    /// A passenger who is also a driver gets the trip on both their user and
    /// driver records so either view of the person sees the same history.
    pub(crate) fn commit_trip(&mut self, trip: Trip) -> Result<&Trip, RegistryError> {
        let id = trip.id();
        if self.trip_index.contains_key(&id) {
            return Err(RegistryError::DuplicateTrip(id));
        }

        if let Some(passenger) = trip.passenger() {
            if let Some(&idx) = self.user_index.get(&passenger) {
                self.users[idx].add_trip(&trip);
            }
            if let Some(&idx) = self.driver_index.get(&passenger) {
                self.drivers[idx].add_trip(&trip);
            }
        }
        if let Some(driver) = trip.driver() {
            if let Some(&idx) = self.driver_index.get(&driver) {
                self.drivers[idx].add_driven_trip(&trip);
            }
        }

        let idx = self.trips.len();
        self.trip_index.insert(id, idx);
        self.trips.push(trip);
        Ok(&self.trips[idx])
    }

    /// # Errors
    /// `InvalidId` for a non-positive id. An unknown id is `Ok(None)`.
    pub fn find_user(&self, id: UserId) -> Result<Option<&User>, RegistryError> {
        check_lookup(id)?;
        Ok(self.user_index.get(&id).map(|&idx| &self.users[idx]))
    }

    /// # Errors
    /// `InvalidId` for a non-positive id. An unknown id is `Ok(None)`.
    pub fn find_driver(&self, id: DriverId) -> Result<Option<&Driver>, RegistryError> {
        check_lookup(id)?;
        Ok(self.driver_index.get(&id).map(|&idx| &self.drivers[idx]))
    }

    pub fn find_trip(&self, id: TripId) -> Result<Option<&Trip>, RegistryError> {
        check_lookup(id)?;
        Ok(self.trip_index.get(&id).map(|&idx| &self.trips[idx]))
    }

    pub(crate) fn driver_mut(&mut self, id: DriverId) -> Option<&mut Driver> {
        self.driver_index.get(&id).map(|&idx| &mut self.drivers[idx])
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Drivers in feed order.
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Resolves a trip history to the trips it names, in order.
    ///
    /// # Errors
    /// `DanglingTrip` for an id the registry does not hold.
    pub fn resolve_trips(&self, ids: &[TripId]) -> Result<Vec<&Trip>, RegistryError> {
        ids.iter()
            .map(|id| {
                self.trip_index
                    .get(id)
                    .map(|&idx| &self.trips[idx])
                    .ok_or(RegistryError::DanglingTrip(*id))
            })
            .collect()
    }

    /// `count + 1`, or one past the highest id if that is already taken.
    pub fn next_trip_id(&self) -> TripId {
        let candidate = self.trips.len() as TripId + 1;
        if !self.trip_index.contains_key(&candidate) {
            return candidate;
        }
        self.trip_index.keys().copied().max().unwrap_or(0) + 1
    }
}

fn check_lookup(id: i64) -> Result<i64, RegistryError> {
    check_id(id).map_err(|_| RegistryError::InvalidId(id))
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trips, {} drivers, {} passengers",
            self.trips.len(),
            self.drivers.len(),
            self.users.len()
        )
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::error::ValidationError;
    use rust_decimal_macros::dec;

    fn loaded() -> Registry {
        let trips = vec![
            trip(1, 2, 1, 10, dec!(10.25), 5),
            trip(2, 5, 3, 11, dec!(23.45), 4),
            trip(3, 8, 5, 12, dec!(15.75), 3),
        ];
        Registry::from_feeds(users(), drivers(), trips).unwrap()
    }

    #[test]
    fn loads_entities_in_feed_order() {
        let registry = loaded();
        assert_eq!(registry.users().len(), 8);
        assert_eq!(registry.users()[0].name(), "User1");
        assert_eq!(registry.users()[7].name(), "Driver8");

        let first = &registry.drivers()[0];
        assert_eq!(first.id(), 2);
        assert_eq!(first.name(), "Driver2");
        assert_eq!(first.status(), DriverStatus::Unavailable);
        assert_eq!(registry.drivers()[2].status(), DriverStatus::Available);
        assert_eq!(registry.to_string(), "3 trips, 3 drivers, 8 passengers");
    }

    #[test]
    fn links_each_trip_exactly_once() {
        let registry = loaded();
        for trip in registry.trips() {
            let driver = registry.find_driver(trip.driver().unwrap()).unwrap().unwrap();
            let hits = driver.driven_trips().iter().filter(|&&id| id == trip.id()).count();
            assert_eq!(hits, 1);

            let passenger = registry.find_user(trip.passenger().unwrap()).unwrap().unwrap();
            assert_eq!(passenger.trips().iter().filter(|&&id| id == trip.id()).count(), 1);
        }
    }

    #[test]
    fn driver_riding_as_passenger_sees_trip_on_both_records() {
        let registry = loaded();
        assert_eq!(registry.find_user(5).unwrap().unwrap().trips(), &[3]);
        let driver = registry.find_driver(5).unwrap().unwrap();
        assert_eq!(driver.trips(), &[3]);
        assert_eq!(driver.driven_trips(), &[2]);
    }

    #[test]
    fn lookups_reject_non_positive_ids() {
        let registry = loaded();
        assert_eq!(registry.find_user(0).unwrap_err(), RegistryError::InvalidId(0));
        assert_eq!(registry.find_driver(-1).unwrap_err(), RegistryError::InvalidId(-1));
        assert_eq!(registry.find_trip(0).unwrap_err(), RegistryError::InvalidId(0));
    }

    #[test]
    fn unknown_ids_are_absent_not_errors() {
        let registry = loaded();
        assert!(registry.find_user(99).unwrap().is_none());
        assert!(registry.find_driver(1).unwrap().is_none());
        assert!(registry.find_user(2).unwrap().is_some());
    }

    #[test]
    fn driver_without_user_row_is_an_integrity_error() {
        let err =
            Registry::from_feeds(users(), vec![DriverRow::new(42, VIN, None)], vec![]).unwrap_err();
        assert_eq!(err, RegistryError::MissingUserForDriver(42));
    }

    #[test]
    fn driver_status_defaults_and_validates() {
        let registry =
            Registry::from_feeds(users(), vec![DriverRow::new(2, VIN, None)], vec![]).unwrap();
        assert_eq!(registry.drivers()[0].status(), DriverStatus::Available);

        let busy = vec![DriverRow::new(2, VIN, Some("BUSY"))];
        let err = Registry::from_feeds(users(), busy, vec![]).unwrap_err();
        assert_eq!(err, RegistryError::Validation(ValidationError::InvalidStatus("BUSY".into())));

        let short = vec![DriverRow::new(2, "short", None)];
        let err = Registry::from_feeds(users(), short, vec![]).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Validation(ValidationError::InvalidVin { len: 5, .. })
        ));
    }

    #[test]
    fn trip_rows_must_resolve() {
        let rows = vec![trip(1, 3, 1, 10, dec!(5), 5)];
        let err = Registry::from_feeds(users(), drivers(), rows).unwrap_err();
        assert_eq!(err, RegistryError::UnknownDriver { trip_id: 1, driver_id: 3 });

        let rows = vec![trip(1, 2, 77, 10, dec!(5), 5)];
        let err = Registry::from_feeds(users(), drivers(), rows).unwrap_err();
        assert_eq!(err, RegistryError::UnknownPassenger { trip_id: 1, passenger_id: 77 });
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut dup_users = users();
        dup_users.push(UserRow::new(1, "Again", ""));
        assert_eq!(
            Registry::from_feeds(dup_users, vec![], vec![]).unwrap_err(),
            RegistryError::DuplicateUser(1)
        );

        let trips = vec![trip(1, 2, 1, 10, dec!(5), 5), trip(1, 5, 1, 11, dec!(5), 5)];
        assert_eq!(
            Registry::from_feeds(users(), drivers(), trips).unwrap_err(),
            RegistryError::DuplicateTrip(1)
        );
    }

    #[test]
    fn invalid_trip_row_fails_construction() {
        let rows = vec![trip(1, 2, 1, 10, dec!(5), 9)];
        let err = Registry::from_feeds(users(), drivers(), rows).unwrap_err();
        assert_eq!(err, RegistryError::Validation(ValidationError::InvalidRating(9)));
    }

    #[test]
    fn next_trip_id_skips_taken_ids() {
        let registry = loaded();
        assert_eq!(registry.next_trip_id(), 4);

        let sparse =
            Registry::from_feeds(users(), drivers(), vec![trip(2, 2, 1, 10, dec!(5), 5)]).unwrap();
        assert_eq!(sparse.next_trip_id(), 3);
    }

    #[test]
    fn resolve_trips_follows_ids() {
        let registry = loaded();
        let driver = registry.find_driver(8).unwrap().unwrap();
        let costs: Vec<_> = registry
            .resolve_trips(driver.driven_trips())
            .unwrap()
            .iter()
            .map(|t| t.cost())
            .collect();
        assert_eq!(costs, vec![Some(dec!(15.75))]);
    }

    #[test]
    fn resolving_an_unknown_trip_id_is_an_integrity_error() {
        let registry = loaded();
        assert_eq!(registry.resolve_trips(&[1, 99]), Err(RegistryError::DanglingTrip(99)));
        assert_eq!(registry.resolve_trips(&[-7]), Err(RegistryError::DanglingTrip(-7)));
        assert_eq!(registry.resolve_trips(&[]), Ok(vec![]));
    }
}
