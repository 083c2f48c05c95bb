use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::FeedError;
use super::{DriverRow, TripRow, UserRow};

/// Trip row as it sits in the file; cost is parsed separately so that a
/// malformed amount is reported with its trip id.
#[derive(Debug, Deserialize)]
struct TripRecord {
    id: i64,
    driver_id: i64,
    passenger_id: i64,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    cost: Option<String>,
    rating: Option<i64>,
}

impl TryFrom<TripRecord> for TripRow {
    type Error = FeedError;

    fn try_from(record: TripRecord) -> Result<Self, Self::Error> {
        let cost = match record.cost.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(Decimal::from_str(raw).map_err(|_| FeedError::InvalidCost {
                trip_id: record.id,
                value: raw.to_string(),
            })?),
        };
        Ok(Self {
            id: record.id,
            driver_id: record.driver_id,
            passenger_id: record.passenger_id,
            start_time: record.start_time,
            end_time: record.end_time,
            cost,
            rating: record.rating,
        })
    }
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, FeedError> {
    let wrap = |source| FeedError::Csv { path: path.display().to_string(), source };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(wrap)?;

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(wrap)?;
    debug!(rows = rows.len(), "Feed read");
    Ok(rows)
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_users(path: impl AsRef<Path>) -> Result<Vec<UserRow>, FeedError> {
    read_rows(path.as_ref())
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_drivers(path: impl AsRef<Path>) -> Result<Vec<DriverRow>, FeedError> {
    read_rows(path.as_ref())
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_trips(path: impl AsRef<Path>) -> Result<Vec<TripRow>, FeedError> {
    read_rows::<TripRecord>(path.as_ref())?
        .into_iter()
        .map(TripRow::try_from)
        .collect()
}
