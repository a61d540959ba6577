//! Typed errors for fare computation and input parsing
//!
//! `FareError` aborts a single rider's bill; `InputError` aborts the run
//! before any bill is computed. Both end the run in practice, since the
//! billing file is never written partially.

use crate::domain::types::{UserId, Zone};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FareError {
    #[error("invalid zone: {0}")]
    InvalidZone(Zone),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("line {line}: malformed timestamp {value:?}")]
    MalformedTimestamp { line: u64, value: String },

    #[error("line {line}: unknown direction {value:?}, expected IN or OUT")]
    UnknownDirection { line: u64, value: String },

    #[error("line {line}: zone {value:?} is not an integer")]
    InvalidZoneRecord { line: u64, value: String },

    #[error("missing header row")]
    MissingHeader,

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("failed to bill user {user}")]
    User {
        user: UserId,
        #[source]
        source: FareError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_error_names_user_and_zone() {
        let err = BillingError::User {
            user: UserId::from("rider-7"),
            source: FareError::InvalidZone(Zone(0)),
        };
        assert_eq!(err.to_string(), "failed to bill user rider-7");
        let source = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(source.as_deref(), Some("invalid zone: 0"));
    }
}
