use tracing::{error, info, instrument};

use crate::clients::LedgerClient;
use crate::dispatch::Dispatcher;
use crate::error::{LedgerError, StartupError};
use crate::feed;
use crate::registry::Registry;
use crate::service::LedgerService;
use super::LedgerConfig;

/// Coordinates the ledger service's lifecycle.
///
/// Loads the feeds, starts the service task and hands out the client.
pub struct LedgerSystem {
    pub ledger_client: LedgerClient,
    handle: tokio::task::JoinHandle<()>,
}

impl LedgerSystem {
    /// Reads the three feeds named in `config` and starts the service on them.
    #[instrument(name = "ledger_system", skip(config))]
    pub fn start(config: &LedgerConfig) -> Result<Self, StartupError> {
        info!("Starting ledger system");
        let registry = load_registry(config)?;
        Ok(Self::with_registry(registry, config.channel_buffer))
    }

    /// Starts the service on an already-built registry.
    pub fn with_registry(registry: Registry, channel_buffer: usize) -> Self {
        let (service, ledger_client) =
            LedgerService::new(channel_buffer, registry, Dispatcher::default());
        let handle = tokio::spawn(service.run());
        info!("Ledger system started successfully");
        Self { ledger_client, handle }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), LedgerError> {
        info!("Shutting down ledger system");
        self.ledger_client.shutdown().await?;

        if let Err(e) = self.handle.await {
            error!(error = ?e, "Service shutdown error");
            return Err(LedgerError::ActorCommunicationError(e.to_string()));
        }

        info!("Ledger system shutdown complete");
        Ok(())
    }
}

/// Builds the registry from the CSV feeds.
pub fn load_registry(config: &LedgerConfig) -> Result<Registry, StartupError> {
    let users = feed::read_users(&config.users)?;
    let drivers = feed::read_drivers(&config.drivers)?;
    let trips = feed::read_trips(&config.trips)?;
    let registry = Registry::from_feeds(users, drivers, trips)?;
    info!(%registry, "Feeds loaded");
    Ok(registry)
}
