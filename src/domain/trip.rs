use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::error::ValidationError;
use super::{check_id, DriverId, TripId, UserId};

/// Fields for a new [`Trip`]. Optional values stay `None` for an in-progress trip.
#[derive(Debug, Clone)]
pub struct TripCreate {
    pub id: TripId,
    pub driver: Option<DriverId>,
    pub passenger: Option<UserId>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub cost: Option<Decimal>,
    pub rating: Option<i64>,
}

/// A ride, either completed or still in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    id: TripId,
    driver: Option<DriverId>,
    passenger: Option<UserId>,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    cost: Option<Decimal>,
    rating: Option<u8>,
}

impl Trip {
    /// Validates and builds a trip.
    ///
    /// # Errors
    /// - `InvalidId` for a non-positive id
    /// - `InvalidRating` for a rating outside 1..=5
    /// - `EndBeforeStart` when `end_time < start_time`
    /// - `NegativeCost` for a cost below zero
    pub fn new(params: TripCreate) -> Result<Self, ValidationError> {
        let id = check_id(params.id)?;

        let rating = match params.rating {
            Some(r @ 1..=5) => Some(r as u8),
            Some(r) => return Err(ValidationError::InvalidRating(r)),
            None => None,
        };

        if let Some(end) = params.end_time {
            if end < params.start_time {
                return Err(ValidationError::EndBeforeStart(id));
            }
        }

        if params.cost.is_some_and(|c| c < Decimal::ZERO) {
            return Err(ValidationError::NegativeCost(id));
        }

        Ok(Self {
            id,
            driver: params.driver,
            passenger: params.passenger,
            start_time: params.start_time,
            end_time: params.end_time,
            cost: params.cost,
            rating,
        })
    }

    /// A freshly requested trip: only the start time is known.
    pub fn in_progress(
        id: TripId,
        driver: DriverId,
        passenger: UserId,
        start_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Self::new(TripCreate {
            id,
            driver: Some(driver),
            passenger: Some(passenger),
            start_time,
            end_time: None,
            cost: None,
            rating: None,
        })
    }

    pub fn id(&self) -> TripId {
        self.id
    }

    pub fn driver(&self) -> Option<DriverId> {
        self.driver
    }

    pub fn passenger(&self) -> Option<UserId> {
        self.passenger
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn cost(&self) -> Option<Decimal> {
        self.cost
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    pub fn is_in_progress(&self) -> bool {
        self.end_time.is_none() && self.cost.is_none() && self.rating.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Time between pickup and drop-off; `None` until the trip has ended.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}
