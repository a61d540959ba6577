//! Domain models - rider identity, zones, taps, and error types
//!
//! - `Journey` - a single tap at a station, resolved to its zone
//! - `Zone`, `UserId`, `Direction`, `Money`, `Bills` - value types
//! - `FareError`, `InputError`, `BillingError` - typed failures

pub mod error;
pub mod journey;
pub mod types;

pub use error::{BillingError, FareError, InputError};
pub use journey::Journey;
pub use types::{Bills, Direction, Money, UserId, Zone};
