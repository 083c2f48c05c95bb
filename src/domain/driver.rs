use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use super::{DriverId, Person, Trip, TripId, User};

pub const VIN_LENGTH: usize = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverStatus {
    #[default]
    Available,
    Unavailable,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Available => "AVAILABLE",
            DriverStatus::Unavailable => "UNAVAILABLE",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AVAILABLE" => Ok(DriverStatus::Available),
            "UNAVAILABLE" => Ok(DriverStatus::Unavailable),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// A user who can also be dispatched as a driver.
///
/// The rider half lives in the embedded [`User`]; `driven_trips` lists the
/// trips this driver drove.
#[derive(Debug, Clone, PartialEq)]
pub struct Driver {
    user: User,
    vehicle_id: String,
    status: DriverStatus,
    driven_trips: Vec<TripId>,
}

impl Driver {
    /// Creates a Driver from its rider profile. `status` defaults to `Available`.
    ///
    /// # Errors
    /// `InvalidVin` unless `vehicle_id` is exactly 17 characters long.
    pub fn new(
        user: User,
        vehicle_id: impl Into<String>,
        status: Option<DriverStatus>,
    ) -> Result<Self, ValidationError> {
        let vehicle_id = vehicle_id.into();
        let len = vehicle_id.chars().count();
        if len != VIN_LENGTH {
            return Err(ValidationError::InvalidVin { vin: vehicle_id, len });
        }
        Ok(Self {
            user,
            vehicle_id,
            status: status.unwrap_or_default(),
            driven_trips: Vec::new(),
        })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn status(&self) -> DriverStatus {
        self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == DriverStatus::Available
    }

    pub fn driven_trips(&self) -> &[TripId] {
        &self.driven_trips
    }

    /// Trips taken as a passenger.
    pub fn trips(&self) -> &[TripId] {
        self.user.trips()
    }

    pub fn add_driven_trip(&mut self, trip: &Trip) {
        self.driven_trips.push(trip.id());
    }

    /// Records a trip this driver took as a passenger.
    pub fn add_trip(&mut self, trip: &Trip) {
        self.user.add_trip(trip);
    }

    pub fn becomes_unavailable(&mut self) {
        self.status = DriverStatus::Unavailable;
    }

    pub fn becomes_available(&mut self) {
        self.status = DriverStatus::Available;
    }
}

impl Person for Driver {
    fn id(&self) -> DriverId {
        self.user.id()
    }

    fn name(&self) -> &str {
        self.user.name()
    }

    fn phone(&self) -> &str {
        self.user.phone()
    }
}
