use std::path::PathBuf;

use clap::Parser;

/// Where the feeds live and how the service is sized.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rideshare",
    about = "Ride-share ledger: load feeds, dispatch trips, report earnings"
)]
pub struct LedgerConfig {
    /// Users feed (id,name,phone_num)
    #[arg(long, env = "RIDESHARE_USERS", default_value = "support/users.csv")]
    pub users: PathBuf,

    /// Drivers feed (id,vin,status)
    #[arg(long, env = "RIDESHARE_DRIVERS", default_value = "support/drivers.csv")]
    pub drivers: PathBuf,

    /// Trips feed (id,driver_id,passenger_id,start_time,end_time,cost,rating)
    #[arg(long, env = "RIDESHARE_TRIPS", default_value = "support/trips.csv")]
    pub trips: PathBuf,

    /// Capacity of the ledger service's request queue
    #[arg(long, default_value_t = 32)]
    pub channel_buffer: usize,

    /// Dispatch a trip for this user id after loading
    #[arg(long)]
    pub request_for: Option<i64>,
}
