//! # Ride-share ledger
//!
//! Riders, drivers and trips, the policy that assigns a driver to a new trip
//! request, and the rating and money figures derived from trip history.
//!
//! - **Domain** - validated entities that refer to each other by id → [`domain`]
//! - **Registry** - owns every entity and performs the trip/driver/passenger join
//!   → [`registry::Registry`]
//! - **Dispatch** - driver selection and the request workflow → [`dispatch::Dispatcher`]
//! - **Metrics** - average rating, revenue and net expenditures → [`metrics`]
//! - **Service** - an actor that owns the registry and serialises every request
//!   → [`service::LedgerService`]
//! - **Client** - cloneable handle with instrumented methods → [`clients::LedgerClient`]
//! - **System** - feed loading, startup and shutdown → [`app_system::LedgerSystem`]
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use clap::Parser;
//! use rideshare_ledger::app_system::{LedgerConfig, LedgerSystem};
//!
//! let system = LedgerSystem::start(&LedgerConfig::parse())?;
//! let trip = system.ledger_client.request_trip(1).await?;
//! println!("trip {} assigned to driver {:?}", trip.id(), trip.driver());
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod error;
pub mod feed;
pub mod registry;
pub mod dispatch;
pub mod metrics;
pub mod messages;
pub mod service;
pub mod clients;
pub mod app_system;

#[cfg(test)]
mod mock_framework;
