//! Feed rows: already-tokenized records for users, drivers and trips.
//!
//! The registry only consumes these typed rows. [`reader`] turns CSV files
//! into them.

pub mod reader;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

pub use reader::*;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    #[serde(alias = "phone_num", default)]
    pub phone: String,
}

/// Joined to a [`UserRow`] by `id` for the name and phone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverRow {
    pub id: i64,
    #[serde(alias = "vin")]
    pub vehicle_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripRow {
    pub id: i64,
    pub driver_id: i64,
    pub passenger_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub cost: Option<Decimal>,
    pub rating: Option<i64>,
}

impl UserRow {
    pub fn new(id: i64, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self { id, name: name.into(), phone: phone.into() }
    }
}

impl DriverRow {
    pub fn new(id: i64, vehicle_id: impl Into<String>, status: Option<&str>) -> Self {
        Self {
            id,
            vehicle_id: vehicle_id.into(),
            status: status.map(str::to_string),
        }
    }
}
