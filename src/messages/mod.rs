use rust_decimal::Decimal;
use tokio::sync::oneshot;

use crate::domain::{Driver, DriverId, DriverStatus, Trip, TripId, User, UserId};
use crate::error::LedgerError;
use crate::metrics::DriverStats;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the ledger service. Each variant carries its
/// parameters and a oneshot channel for the reply.
#[derive(Debug)]
pub enum LedgerRequest {
    FindUser {
        id: UserId,
        respond_to: ServiceResponse<Option<User>, LedgerError>,
    },
    FindDriver {
        id: DriverId,
        respond_to: ServiceResponse<Option<Driver>, LedgerError>,
    },
    FindTrip {
        id: TripId,
        respond_to: ServiceResponse<Option<Trip>, LedgerError>,
    },
    ListUsers {
        respond_to: ServiceResponse<Vec<User>, LedgerError>,
    },
    ListDrivers {
        respond_to: ServiceResponse<Vec<Driver>, LedgerError>,
    },
    ListTrips {
        respond_to: ServiceResponse<Vec<Trip>, LedgerError>,
    },
    RequestTrip {
        user_id: UserId,
        respond_to: ServiceResponse<Trip, LedgerError>,
    },
    SetDriverStatus {
        driver_id: DriverId,
        status: DriverStatus,
        respond_to: ServiceResponse<Driver, LedgerError>,
    },
    DriverStats {
        driver_id: DriverId,
        respond_to: ServiceResponse<DriverStats, LedgerError>,
    },
    NetExpenditures {
        user_id: UserId,
        respond_to: ServiceResponse<Decimal, LedgerError>,
    },
    Shutdown,
    #[cfg(test)]
    GetTripCount {
        respond_to: ServiceResponse<usize, LedgerError>,
    },
}
