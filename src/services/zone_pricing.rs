//! Zone pricing table
//!
//! Each completed trip pays a surcharge for its entry zone and another for its
//! exit zone. Inner zones cost more:
//! - zone 1: 0.80
//! - zones 2-3: 0.50
//! - zones 4-5: 0.30
//! - zone 6 and beyond: 0.10

use crate::domain::{FareError, Money, Zone};
use rust_decimal_macros::dec;

/// Additional cost for entering or leaving through `zone`
///
/// Fails with `FareError::InvalidZone` for zone 0 and below.
pub fn additional_cost(zone: Zone) -> Result<Money, FareError> {
    match zone.0 {
        1 => Ok(dec!(0.80)),
        2..=3 => Ok(dec!(0.50)),
        4..=5 => Ok(dec!(0.30)),
        z if z >= 6 => Ok(dec!(0.10)),
        _ => Err(FareError::InvalidZone(zone)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_costs() {
        let cases = [
            (1, dec!(0.80)),
            (2, dec!(0.50)),
            (3, dec!(0.50)),
            (4, dec!(0.30)),
            (5, dec!(0.30)),
            (6, dec!(0.10)),
            (10, dec!(0.10)),
            (i32::MAX, dec!(0.10)),
        ];
        for (zone, expected) in cases {
            assert_eq!(additional_cost(Zone(zone)), Ok(expected), "zone {}", zone);
        }
    }

    #[test]
    fn test_invalid_zones() {
        assert_eq!(additional_cost(Zone(0)), Err(FareError::InvalidZone(Zone(0))));
        assert_eq!(additional_cost(Zone(-3)), Err(FareError::InvalidZone(Zone(-3))));
        assert!(additional_cost(Zone(i32::MIN)).is_err());
    }

    #[test]
    fn test_cost_non_increasing_with_zone() {
        let costs: Vec<Money> = (1..=20).map(|z| additional_cost(Zone(z)).unwrap()).collect();
        for pair in costs.windows(2) {
            assert!(pair[0] >= pair[1], "{} then {}", pair[0], pair[1]);
        }
    }
}
