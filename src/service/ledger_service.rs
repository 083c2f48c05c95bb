use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::LedgerClient;
use crate::dispatch::Dispatcher;
use crate::domain::{Driver, DriverId, DriverStatus, Person, Trip, TripId, User, UserId};
use crate::error::{DispatchError, LedgerError, RegistryError};
use crate::messages::{LedgerRequest, ServiceResponse};
use crate::metrics;
use crate::registry::Registry;

/// Owns the registry and handles one request at a time.
///
/// Every mutation goes through this task's loop, so selecting a driver,
/// marking them unavailable and recording the trip cannot interleave with
/// another request.
pub struct LedgerService {
    receiver: mpsc::Receiver<LedgerRequest>,
    registry: Registry,
    dispatcher: Dispatcher,
}

impl LedgerService {
    pub fn new(
        buffer_size: usize,
        registry: Registry,
        dispatcher: Dispatcher,
    ) -> (Self, LedgerClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            registry,
            dispatcher,
        };
        let client = LedgerClient::new(sender);
        (service, client)
    }

    #[instrument(name = "ledger_service", skip(self))]
    pub async fn run(mut self) {
        info!(registry = %self.registry, "LedgerService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LedgerRequest::FindUser { id, respond_to } => self.handle_find_user(id, respond_to),
                LedgerRequest::FindDriver { id, respond_to } => {
                    self.handle_find_driver(id, respond_to);
                }
                LedgerRequest::FindTrip { id, respond_to } => self.handle_find_trip(id, respond_to),
                LedgerRequest::ListUsers { respond_to } => {
                    let _ = respond_to.send(Ok(self.registry.users().to_vec()));
                }
                LedgerRequest::ListDrivers { respond_to } => {
                    let _ = respond_to.send(Ok(self.registry.drivers().to_vec()));
                }
                LedgerRequest::ListTrips { respond_to } => {
                    let _ = respond_to.send(Ok(self.registry.trips().to_vec()));
                }
                LedgerRequest::RequestTrip { user_id, respond_to } => {
                    self.handle_request_trip(user_id, respond_to);
                }
                LedgerRequest::SetDriverStatus { driver_id, status, respond_to } => {
                    self.handle_set_driver_status(driver_id, status, respond_to);
                }
                LedgerRequest::DriverStats { driver_id, respond_to } => {
                    self.handle_driver_stats(driver_id, respond_to);
                }
                LedgerRequest::NetExpenditures { user_id, respond_to } => {
                    self.handle_net_expenditures(user_id, respond_to);
                }
                LedgerRequest::Shutdown => {
                    info!("LedgerService shutting down");
                    break;
                }
                #[cfg(test)]
                LedgerRequest::GetTripCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.registry.trips().len()));
                }
            }
        }

        info!(registry = %self.registry, "LedgerService stopped");
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_find_user(&self, id: UserId, respond_to: ServiceResponse<Option<User>, LedgerError>) {
        debug!("Processing find_user request");
        let result = self
            .registry
            .find_user(id)
            .map(|user| user.cloned())
            .map_err(LedgerError::from);
        if let Ok(None) = &result {
            debug!("User not found");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(driver_id = %id), skip(self, respond_to))]
    fn handle_find_driver(
        &self,
        id: DriverId,
        respond_to: ServiceResponse<Option<Driver>, LedgerError>,
    ) {
        debug!("Processing find_driver request");
        let result = self
            .registry
            .find_driver(id)
            .map(|driver| driver.cloned())
            .map_err(LedgerError::from);
        let _ = respond_to.send(result);
    }

    #[instrument(fields(trip_id = %id), skip(self, respond_to))]
    fn handle_find_trip(&self, id: TripId, respond_to: ServiceResponse<Option<Trip>, LedgerError>) {
        debug!("Processing find_trip request");
        let result = self
            .registry
            .find_trip(id)
            .map(|trip| trip.cloned())
            .map_err(LedgerError::from);
        let _ = respond_to.send(result);
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_request_trip(
        &mut self,
        user_id: UserId,
        respond_to: ServiceResponse<Trip, LedgerError>,
    ) {
        debug!("Processing request_trip request");

        let result = self.dispatcher.request_trip(&mut self.registry, user_id);
        match &result {
            Ok(trip) => info!(trip_id = trip.id(), driver_id = ?trip.driver(), "Trip requested"),
            Err(DispatchError::NoDriversAvailable) => warn!("No drivers available"),
            Err(e) => error!(error = %e, "Trip request failed"),
        }

        let _ = respond_to.send(result.map_err(LedgerError::from));
    }

    #[instrument(fields(driver_id = %driver_id, status = %status), skip(self, respond_to))]
    fn handle_set_driver_status(
        &mut self,
        driver_id: DriverId,
        status: DriverStatus,
        respond_to: ServiceResponse<Driver, LedgerError>,
    ) {
        debug!("Processing set_driver_status request");

        if let Err(e) = self.registry.find_driver(driver_id) {
            let _ = respond_to.send(Err(e.into()));
            return;
        }
        let result = match self.registry.driver_mut(driver_id) {
            Some(driver) => {
                match status {
                    DriverStatus::Available => driver.becomes_available(),
                    DriverStatus::Unavailable => driver.becomes_unavailable(),
                }
                info!(driver_name = %driver.name(), "Driver status updated");
                Ok(driver.clone())
            }
            None => {
                warn!("Driver not found for status update");
                Err(RegistryError::DriverNotFound(driver_id).into())
            }
        };

        let _ = respond_to.send(result);
    }

    #[instrument(fields(driver_id = %driver_id), skip(self, respond_to))]
    fn handle_driver_stats(
        &self,
        driver_id: DriverId,
        respond_to: ServiceResponse<metrics::DriverStats, LedgerError>,
    ) {
        debug!("Processing driver_stats request");
        let result = metrics::driver_stats(&self.registry, driver_id).map_err(LedgerError::from);
        if let Err(e) = &result {
            error!(error = %e, "Driver stats failed");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(user_id = %user_id), skip(self, respond_to))]
    fn handle_net_expenditures(
        &self,
        user_id: UserId,
        respond_to: ServiceResponse<Decimal, LedgerError>,
    ) {
        debug!("Processing net_expenditures request");
        let result =
            metrics::user_net_expenditures(&self.registry, user_id).map_err(LedgerError::from);
        if let Err(e) = &result {
            error!(error = %e, "Net expenditures failed");
        }
        let _ = respond_to.send(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricsError;
    use crate::registry::fixtures::{drivers, trip, users};
    use rust_decimal_macros::dec;

    fn start() -> LedgerClient {
        let registry = Registry::from_feeds(
            users(),
            drivers(),
            vec![trip(1, 5, 1, 10, dec!(10.25), 5), trip(2, 8, 1, 11, dec!(23.45), 3)],
        )
        .unwrap();
        let (service, client) = LedgerService::new(10, registry, Dispatcher::default());
        tokio::spawn(service.run());
        client
    }

    #[tokio::test]
    async fn dispatch_goes_through_the_service() -> Result<(), Box<dyn std::error::Error>> {
        let client = start();
        assert_eq!(client.get_trip_count().await?, 2);

        let trip = client.request_trip(3).await?;
        assert_eq!(trip.driver(), Some(5));
        assert_eq!(client.get_trip_count().await?, 3);

        let driver = client.find_driver(5).await?.expect("driver 5");
        assert_eq!(driver.status(), DriverStatus::Unavailable);
        assert_eq!(client.find_trip(trip.id()).await?, Some(trip));

        client.shutdown().await?;
        Ok(())
    }

    #[tokio::test]
    async fn errors_come_back_typed() -> Result<(), Box<dyn std::error::Error>> {
        let client = start();
        assert_eq!(
            client.find_user(0).await,
            Err(LedgerError::Registry(RegistryError::InvalidId(0)))
        );
        assert_eq!(client.find_user(42).await?, None);

        client.request_trip(3).await?;
        client.request_trip(3).await?;
        assert_eq!(
            client.request_trip(3).await,
            Err(LedgerError::Dispatch(DispatchError::NoDriversAvailable))
        );

        client.set_driver_status(8, DriverStatus::Available).await?;
        let trip = client.request_trip(3).await?;
        assert_eq!(trip.driver(), Some(8));

        assert_eq!(
            client.set_driver_status(3, DriverStatus::Available).await,
            Err(LedgerError::Registry(RegistryError::DriverNotFound(3)))
        );
        assert_eq!(
            client.set_driver_status(-1, DriverStatus::Available).await,
            Err(LedgerError::Registry(RegistryError::InvalidId(-1)))
        );
        client.shutdown().await?;
        Ok(())
    }

    #[tokio::test]
    async fn metrics_are_served() -> Result<(), Box<dyn std::error::Error>> {
        let client = start();
        let stats = client.driver_stats(5).await?;
        assert_eq!(stats.average_rating, 5.0);
        assert_eq!(stats.total_revenue, dec!(6.88));
        assert_eq!(client.net_expenditures(1).await?, dec!(33.70));
        assert_eq!(client.net_expenditures(5).await?, dec!(-6.88));
        client.shutdown().await?;
        Ok(())
    }

    #[tokio::test]
    async fn overflowing_totals_do_not_take_the_service_down(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let registry = Registry::from_feeds(
            users(),
            drivers(),
            vec![trip(1, 5, 1, 10, Decimal::MAX, 5), trip(2, 5, 1, 11, Decimal::MAX, 4)],
        )
        .unwrap();
        let (service, client) = LedgerService::new(10, registry, Dispatcher::default());
        tokio::spawn(service.run());

        assert_eq!(
            client.net_expenditures(1).await,
            Err(LedgerError::Metrics(MetricsError::Overflow { trip_id: 2 }))
        );
        assert!(matches!(
            client.driver_stats(5).await,
            Err(LedgerError::Metrics(MetricsError::Overflow { .. }))
        ));

        assert_eq!(client.get_trip_count().await?, 2);
        assert_eq!(client.request_trip(3).await?.driver(), Some(8));
        client.shutdown().await?;
        Ok(())
    }
}
