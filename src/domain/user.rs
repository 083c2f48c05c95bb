use crate::error::ValidationError;
use super::{check_id, Trip, TripId, UserId};

/// Identity shared by riders and drivers.
pub trait Person {
    fn id(&self) -> UserId;
    fn name(&self) -> &str;
    fn phone(&self) -> &str;
}

/// Represents a rider.
///
/// `trips` lists the trips this user took as a passenger, in the order they
/// were linked. It only grows.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: String,
    phone: String,
    trips: Vec<TripId>,
}

impl User {
    /// Creates a new User with no trips.
    ///
    /// # Errors
    /// `InvalidId` for a non-positive id, `EmptyName` for a blank name.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let id = check_id(id)?;
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName(id));
        }
        Ok(Self {
            id,
            name,
            phone: phone.into(),
            trips: Vec::new(),
        })
    }

    pub fn trips(&self) -> &[TripId] {
        &self.trips
    }

    /// Records `trip` as taken by this user. Only a constructed [`Trip`] is
    /// accepted, so the id is always a validated one.
    pub fn add_trip(&mut self, trip: &Trip) {
        self.trips.push(trip.id());
    }
}

impl Person for User {
    fn id(&self) -> UserId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn phone(&self) -> &str {
        &self.phone
    }
}
