//! Journey tap reader
//!
//! CSV with a header row, then `user_id,station,direction,timestamp` per
//! line. Stations are resolved to zones as rows are read and taps are
//! grouped per user, keeping file order within each user.
//!
//! User ids are opaque and kept byte for byte; only the station, direction
//! and timestamp columns are trimmed.

use crate::domain::types::UnknownDirection;
use crate::domain::{Direction, InputError, Journey, UserId, Zone};
use crate::infra::Metrics;
use crate::io::zone_map::StationZones;
use anyhow::Context;
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Each user's taps, in file order
pub type JourneysByUser = FxHashMap<UserId, Vec<Journey>>;

#[derive(Debug, Deserialize)]
struct JourneyRecord {
    user_id: String,
    station: String,
    direction: String,
    timestamp: String,
}

/// Parse journey rows from any reader
///
/// A station missing from `stations` resolves to `Zone::UNKNOWN`, which the
/// fare calculator rejects if the tap is ever priced.
pub fn parse_journey_data<R: Read>(
    reader: R,
    stations: &StationZones,
    timestamp_format: &str,
    metrics: &Metrics,
) -> Result<JourneysByUser, InputError> {
    let mut csv = ReaderBuilder::new().has_headers(true).from_reader(reader);
    if csv.headers()?.is_empty() {
        return Err(InputError::MissingHeader);
    }

    let mut journeys = JourneysByUser::default();
    let mut rows = 0u64;
    for result in csv.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let row: JourneyRecord = record.deserialize(None)?;

        let station = row.station.trim();
        let zone = match stations.get(station) {
            Some(zone) => *zone,
            None => {
                warn!(line = %line, user = %row.user_id, station = %station, "unknown_station");
                metrics.record_unknown_station();
                Zone::UNKNOWN
            }
        };

        let direction = row
            .direction
            .parse::<Direction>()
            .map_err(|UnknownDirection(value)| InputError::UnknownDirection { line, value })?;

        let raw_timestamp = row.timestamp.trim();
        let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, timestamp_format)
            .map_err(|_| InputError::MalformedTimestamp { line, value: raw_timestamp.to_string() })?;

        journeys
            .entry(UserId(row.user_id))
            .or_default()
            .push(Journey::new(zone, direction, timestamp));
        rows += 1;
    }

    metrics.record_journeys(rows);
    Ok(journeys)
}

/// Read the journey file at `path`
pub fn read_journey_data<P: AsRef<Path>>(
    path: P,
    stations: &StationZones,
    timestamp_format: &str,
    metrics: &Metrics,
) -> anyhow::Result<JourneysByUser> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open journey data {}", path.display()))?;
    let journeys = parse_journey_data(file, stations, timestamp_format, metrics)
        .with_context(|| format!("Failed to read journey data {}", path.display()))?;

    info!(file = %path.display(), users = %journeys.len(), "journeys_loaded");
    Ok(journeys)
}
