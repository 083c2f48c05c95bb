use thiserror::Error;

use crate::domain::{DriverId, TripId, UserId};

/// Construction-time failures. No partially built entity escapes one of these.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid id: {0} (ids must be positive)")]
    InvalidId(i64),
    #[error("Name cannot be blank (id {0})")]
    EmptyName(i64),
    #[error("Invalid vehicle id {vin:?}: expected 17 characters, got {len}")]
    InvalidVin { vin: String, len: usize },
    #[error("Invalid driver status: {0}")]
    InvalidStatus(String),
    #[error("Invalid rating {0}: must be between 1 and 5")]
    InvalidRating(i64),
    #[error("Start time cannot be after end time (trip {0})")]
    EndBeforeStart(i64),
    #[error("Cost cannot be negative (trip {0})")]
    NegativeCost(i64),
}

/// Failures while building the entity graph from feeds or looking entities up.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    #[error("ID cannot be blank or less than zero (got {0})")]
    InvalidId(i64),
    #[error("User already exists: {0}")]
    DuplicateUser(UserId),
    #[error("Driver already exists: {0}")]
    DuplicateDriver(DriverId),
    #[error("Trip already exists: {0}")]
    DuplicateTrip(TripId),
    #[error("No user record for driver {0}")]
    MissingUserForDriver(DriverId),
    #[error("Trip {trip_id} references unknown driver {driver_id}")]
    UnknownDriver { trip_id: TripId, driver_id: DriverId },
    #[error("Trip {trip_id} references unknown passenger {passenger_id}")]
    UnknownPassenger { trip_id: TripId, passenger_id: UserId },
    #[error("Driver not found: {0}")]
    DriverNotFound(DriverId),
    #[error("Trip history refers to unknown trip {0}")]
    DanglingTrip(TripId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failures of the trip request workflow.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    #[error("ID cannot be blank or less than zero (got {0})")]
    InvalidId(i64),
    #[error("User not found: {0}")]
    UnknownUser(UserId),
    #[error("Driver not found: {0}")]
    UnknownDriver(DriverId),
    #[error("No drivers available")]
    NoDriversAvailable,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Data-integrity failures surfaced while aggregating trip history.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetricsError {
    #[error("Completed trip {trip_id} has no {missing}")]
    IncompleteTrip { trip_id: TripId, missing: &'static str },
    #[error("ID cannot be blank or less than zero (got {0})")]
    InvalidId(i64),
    #[error("User not found: {0}")]
    UnknownUser(UserId),
    #[error("Driver not found: {0}")]
    UnknownDriver(DriverId),
    #[error("Amount overflowed while adding trip {trip_id}")]
    Overflow { trip_id: TripId },
    #[error("Net expenditures overflowed")]
    NetOverflow,
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Failures reading a feed file.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Failed to read feed {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("Invalid cost {value:?} in trip row {trip_id}")]
    InvalidCost { trip_id: i64, value: String },
}

/// Everything a caller of the ledger service can get back.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Failures bringing the ledger system up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("Failed to build registry: {0}")]
    Registry(#[from] RegistryError),
}
