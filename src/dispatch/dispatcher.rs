use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::domain::{check_id, Driver, Person, Trip, UserId};
use crate::error::DispatchError;
use crate::registry::Registry;
use super::selection::{DriverSelection, IdleLongest};

/// Turns a rider's request into an in-progress trip with a driver attached.
pub struct Dispatcher {
    policy: Box<dyn DriverSelection>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Box::new(IdleLongest))
    }
}

impl Dispatcher {
    pub fn new(policy: Box<dyn DriverSelection>) -> Self {
        Self { policy }
    }

    /// Requests a trip starting now.
    pub fn request_trip(
        &self,
        registry: &mut Registry,
        user_id: UserId,
    ) -> Result<Trip, DispatchError> {
        self.request_trip_at(registry, user_id, Utc::now())
    }

    /// Selects a driver, creates the trip, marks the driver unavailable and
    /// links the trip to driver, passenger and the trip collection.
    ///
    /// Nothing is mutated unless the whole request succeeds.
    ///
    /// # Errors
    /// - `InvalidId` for a non-positive user id
    /// - `UnknownUser` when no such user exists
    /// - `NoDriversAvailable` when no available driver other than the rider exists
    /// - `Registry` when the trip history is inconsistent or the trip cannot be recorded
    #[instrument(skip(self, registry))]
    pub fn request_trip_at(
        &self,
        registry: &mut Registry,
        user_id: UserId,
        start_time: DateTime<Utc>,
    ) -> Result<Trip, DispatchError> {
        check_id(user_id).map_err(|_| DispatchError::InvalidId(user_id))?;
        if registry.find_user(user_id).ok().flatten().is_none() {
            return Err(DispatchError::UnknownUser(user_id));
        }

        let eligible = eligible_drivers(registry, user_id);
        if eligible.is_empty() {
            return Err(DispatchError::NoDriversAvailable);
        }
        let driver_id = self
            .policy
            .select(&eligible, registry)?
            .map(|driver| driver.id())
            .ok_or(DispatchError::NoDriversAvailable)?;

        let trip = Trip::in_progress(registry.next_trip_id(), driver_id, user_id, start_time)?;
        registry.commit_trip(trip.clone())?;
        registry
            .driver_mut(driver_id)
            .ok_or(DispatchError::UnknownDriver(driver_id))?
            .becomes_unavailable();

        debug!(trip_id = trip.id(), driver_id, "Trip dispatched");
        Ok(trip)
    }
}

/// Available drivers other than `user_id`, in feed order.
pub fn eligible_drivers(registry: &Registry, user_id: UserId) -> Vec<&Driver> {
    registry
        .drivers()
        .iter()
        .filter(|driver| driver.is_available() && driver.id() != user_id)
        .collect()
}
