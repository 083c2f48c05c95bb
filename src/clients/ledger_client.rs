use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{Driver, DriverId, DriverStatus, Trip, TripId, User, UserId};
use crate::error::LedgerError;
use crate::messages::LedgerRequest;
use crate::metrics::DriverStats;

/// Client for [`LedgerService`](crate::service::LedgerService).
///
/// Clones share the same service, so concurrent callers are serialised by
/// the service loop.
#[derive(Clone)]
pub struct LedgerClient {
    sender: mpsc::Sender<LedgerRequest>,
}

impl LedgerClient {
    pub fn new(sender: mpsc::Sender<LedgerRequest>) -> Self {
        Self { sender }
    }

    /// Asks the service to stop after the requests already queued.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), LedgerError> {
        debug!("Sending shutdown request");
        self.sender
            .send(LedgerRequest::Shutdown)
            .await
            .map_err(|_| LedgerError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(LedgerClient => fn find_user(id: UserId) -> Option<User> as LedgerRequest::FindUser, Error = LedgerError);
client_method!(LedgerClient => fn find_driver(id: DriverId) -> Option<Driver> as LedgerRequest::FindDriver, Error = LedgerError);
client_method!(LedgerClient => fn find_trip(id: TripId) -> Option<Trip> as LedgerRequest::FindTrip, Error = LedgerError);
client_method!(LedgerClient => fn list_users() -> Vec<User> as LedgerRequest::ListUsers, Error = LedgerError);
client_method!(LedgerClient => fn list_drivers() -> Vec<Driver> as LedgerRequest::ListDrivers, Error = LedgerError);
client_method!(LedgerClient => fn list_trips() -> Vec<Trip> as LedgerRequest::ListTrips, Error = LedgerError);
client_method!(LedgerClient => fn request_trip(user_id: UserId) -> Trip as LedgerRequest::RequestTrip, Error = LedgerError);
client_method!(LedgerClient => fn set_driver_status(driver_id: DriverId, status: DriverStatus) -> Driver as LedgerRequest::SetDriverStatus, Error = LedgerError);
client_method!(LedgerClient => fn driver_stats(driver_id: DriverId) -> DriverStats as LedgerRequest::DriverStats, Error = LedgerError);
client_method!(LedgerClient => fn net_expenditures(user_id: UserId) -> Decimal as LedgerRequest::NetExpenditures, Error = LedgerError);

// Test-only message for inspecting service state
#[cfg(test)]
client_method!(LedgerClient => fn get_trip_count() -> usize as LedgerRequest::GetTripCount, Error = LedgerError);
