//! Billing service - bills every rider and runs the file pipeline
//!
//! Riders are billed independently; a fare error for any one of them aborts
//! the run before the output file is touched.

use crate::domain::{BillingError, Bills, UserId};
use crate::infra::{Config, Metrics};
use crate::io::{read_journey_data, read_zone_map, BillWriter, JourneysByUser};
use crate::services::fare_calculator::bill_journeys;
use tracing::{debug, info};

/// Compute the capped monthly amount for every user
///
/// Users are visited in ascending id order so logs and the first reported
/// failure are deterministic.
pub fn bill_users(journeys: &JourneysByUser, metrics: &Metrics) -> Result<Bills, BillingError> {
    let mut users: Vec<&UserId> = journeys.keys().collect();
    users.sort_unstable();

    let mut bills = Bills::new();
    for user in users {
        let user_journeys = &journeys[user];
        let bill = bill_journeys(user_journeys)
            .map_err(|source| BillingError::User { user: user.clone(), source })?;

        debug!(
            user = %user,
            journeys = %user_journeys.len(),
            trips = %bill.trips,
            unmatched_entries = %bill.unmatched_entries,
            unmatched_exits = %bill.unmatched_exits,
            days = %bill.days.len(),
            total = %bill.total,
            "user_billed"
        );
        metrics.record_bill(&bill);
        bills.insert(user.clone(), bill.total.round_dp(2));
    }

    Ok(bills)
}

/// End-to-end billing run: read zones and taps, bill, write the result file
pub struct BillingService {
    config: Config,
    metrics: Metrics,
}

impl BillingService {
    pub fn new(config: Config) -> Self {
        Self { config, metrics: Metrics::new() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run the pipeline and return the bills that were written
    pub fn process_billing(&self) -> anyhow::Result<Bills> {
        let stations = read_zone_map(self.config.zone_map())?;
        let journeys = read_journey_data(
            self.config.journey_data(),
            &stations,
            self.config.timestamp_format(),
            &self.metrics,
        )?;

        let bills = bill_users(&journeys, &self.metrics)?;
        info!(users = %bills.len(), "billing_computed");

        BillWriter::new(self.config.output_file()).write_bills(&bills)?;
        Ok(bills)
    }
}
