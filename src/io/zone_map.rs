//! Station to zone map reader
//!
//! CSV with a header row, then `station,zone` per line. Later rows for the
//! same station replace earlier ones.

use crate::domain::{InputError, Zone};
use anyhow::Context;
use csv::{ReaderBuilder, Trim};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Station name to fare zone
pub type StationZones = FxHashMap<String, Zone>;

#[derive(Debug, Deserialize)]
struct ZoneRecord {
    station: String,
    zone: String,
}

/// Parse a zone map from any reader
pub fn parse_zone_map<R: Read>(reader: R) -> Result<StationZones, InputError> {
    let mut csv = ReaderBuilder::new().has_headers(true).trim(Trim::All).from_reader(reader);
    if csv.headers()?.is_empty() {
        return Err(InputError::MissingHeader);
    }

    let mut stations = StationZones::default();
    for result in csv.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let row: ZoneRecord = record.deserialize(None)?;

        let zone = row
            .zone
            .parse::<i32>()
            .map_err(|_| InputError::InvalidZoneRecord { line, value: row.zone.clone() })?;

        if let Some(previous) = stations.insert(row.station, Zone(zone)) {
            debug!(line = %line, previous = %previous, zone = %zone, "station_zone_replaced");
        }
    }

    Ok(stations)
}

/// Read the zone map file at `path`
pub fn read_zone_map<P: AsRef<Path>>(path: P) -> anyhow::Result<StationZones> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open zone map {}", path.display()))?;
    let stations = parse_zone_map(file)
        .with_context(|| format!("Failed to read zone map {}", path.display()))?;

    info!(file = %path.display(), stations = %stations.len(), "zone_map_loaded");
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_zone_map() {
        let input = "station,zone\nAldgate,1\nBarbican, 1\nWimbledon,3\n";

        let stations = parse_zone_map(input.as_bytes()).unwrap();

        assert_eq!(stations.len(), 3);
        assert_eq!(stations["Aldgate"], Zone(1));
        assert_eq!(stations["Barbican"], Zone(1));
        assert_eq!(stations["Wimbledon"], Zone(3));
    }

    #[test]
    fn test_header_only() {
        let stations = parse_zone_map("station,zone\n".as_bytes()).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(parse_zone_map("".as_bytes()), Err(InputError::MissingHeader)));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let input = "station,zone\nBank,1\nBank,2\n";
        let stations = parse_zone_map(input.as_bytes()).unwrap();
        assert_eq!(stations["Bank"], Zone(2));
    }

    #[test]
    fn test_non_integer_zone() {
        let input = "station,zone\nBank,1\nMorden,four\n";

        let err = parse_zone_map(input.as_bytes()).unwrap_err();

        match err {
            InputError::InvalidZoneRecord { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "four");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_zone_is_read_as_is() {
        // Rejected later by the pricing table, not here
        let stations = parse_zone_map("station,zone\nDepot,0\n".as_bytes()).unwrap();
        assert_eq!(stations["Depot"], Zone(0));
    }

    #[test]
    fn test_short_row_is_csv_error() {
        let input = "station,zone\nBank\n";
        assert!(matches!(parse_zone_map(input.as_bytes()), Err(InputError::Csv(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_zone_map("/nonexistent/zones.csv").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/zones.csv"));
    }
}
