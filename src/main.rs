use clap::Parser;
use tracing::{error, info, warn, Instrument};

use rideshare_ledger::app_system::{setup_tracing, LedgerConfig, LedgerSystem};
use rideshare_ledger::domain::Person;
use rideshare_ledger::error::{DispatchError, LedgerError};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let config = LedgerConfig::parse();

    info!(?config, "Starting ride-share ledger");
    let system = LedgerSystem::start(&config).map_err(|e| e.to_string())?;
    let client = system.ledger_client.clone();

    if let Some(user_id) = config.request_for {
        let span = tracing::info_span!("trip_request", user_id);
        let result = async {
            info!("Requesting trip");
            client.request_trip(user_id).await
        }
        .instrument(span)
        .await;

        match result {
            Ok(trip) => info!(trip_id = trip.id(), driver_id = ?trip.driver(), "Trip dispatched"),
            Err(LedgerError::Dispatch(DispatchError::NoDriversAvailable)) => {
                warn!(user_id, "No drivers available, try again later")
            }
            Err(e) => error!(error = %e, "Trip request failed"),
        }
    }

    let drivers = client.list_drivers().await.map_err(|e| e.to_string())?;
    for driver in &drivers {
        match client.driver_stats(driver.id()).await {
            Ok(stats) => info!(
                driver_id = stats.driver_id,
                driver_name = %driver.name(),
                status = %driver.status(),
                trips = stats.driven_trip_count,
                average_rating = stats.average_rating,
                total_revenue = %stats.total_revenue,
                "Driver summary"
            ),
            Err(e) => error!(driver_id = driver.id(), error = %e, "Driver summary failed"),
        }
    }

    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Ledger run completed");
    Ok(())
}
