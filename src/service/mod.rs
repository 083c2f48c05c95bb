//! The ledger service: sole owner of the [`Registry`](crate::registry::Registry).

pub mod ledger_service;

pub use ledger_service::*;
