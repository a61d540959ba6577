//! Journey event model: a single tap at a station gate

use crate::domain::types::{Direction, Zone};
use chrono::{Datelike, NaiveDateTime};

/// One tap-in or tap-out, with the station already resolved to its zone
///
/// Journeys are immutable once read and owned by their rider's sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    zone: Zone,
    direction: Direction,
    timestamp: NaiveDateTime,
}

impl Journey {
    pub fn new(zone: Zone, direction: Direction, timestamp: NaiveDateTime) -> Self {
        Self { zone, direction, timestamp }
    }

    #[inline]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Day of month (1-31) used for day-boundary detection
    ///
    /// Only the day-of-month is compared, so the 5th of two different months
    /// counts as the same day when adjacent in a sequence.
    #[inline]
    pub fn day_of_month(&self) -> u32 {
        self.timestamp.day()
    }
}
