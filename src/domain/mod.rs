//! Ledger entities: riders, drivers and trips.
//!
//! Entities reference each other by id only. The [`Registry`](crate::registry::Registry)
//! owns every instance and resolves ids back to entities on read.

pub mod user;
pub mod driver;
pub mod trip;

pub use user::*;
pub use driver::*;
pub use trip::*;

pub type UserId = i64;
pub type DriverId = i64;
pub type TripId = i64;

/// Fails with `InvalidId` unless `id` is positive.
pub(crate) fn check_id(id: i64) -> Result<i64, crate::error::ValidationError> {
    if id <= 0 {
        return Err(crate::error::ValidationError::InvalidId(id));
    }
    Ok(id)
}
