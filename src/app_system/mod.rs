//! System orchestration, configuration, startup and shutdown.

pub mod ledger_system;
pub mod config;
pub mod tracing;

pub use ledger_system::*;
pub use config::*;
pub use self::tracing::*;
