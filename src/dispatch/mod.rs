//! Driver selection and the trip request workflow.

pub mod selection;
pub mod dispatcher;

pub use selection::{DriverSelection, IdleLongest};
pub use dispatcher::*;
