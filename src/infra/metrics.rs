//! Billing run counters and end-of-run summary
//!
//! Counters are relaxed atomics so the calculator can be driven from several
//! threads without a lock. They are statistics only and never feed back into
//! fare logic.

use crate::domain::Money;
use crate::services::fare_calculator::MonthlyBill;
use rust_decimal::prelude::ToPrimitive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Upper bounds (whole currency units) for the billed-amount histogram
/// Buckets: ≤5, ≤10, ≤15, ≤25, ≤50, ≤75, ≤100
const BILL_BUCKET_BOUNDS: [u64; 6] = [5, 10, 15, 25, 50, 75];
const NUM_BILL_BUCKETS: usize = 7;

/// Histogram bucket for a billed amount, rounded up to whole units
#[inline]
fn bill_bucket_index(amount: Money) -> usize {
    let units = amount.ceil().to_u64().unwrap_or(0);
    BILL_BUCKET_BOUNDS.partition_point(|&bound| bound < units)
}

/// Counters for one billing run
pub struct Metrics {
    users_billed: AtomicU64,
    journeys_total: AtomicU64,
    trips_total: AtomicU64,
    unmatched_entries: AtomicU64,
    unmatched_exits: AtomicU64,
    /// Days where the accrued total exceeded the daily cap
    days_capped: AtomicU64,
    /// Users whose month hit the monthly cap
    users_month_capped: AtomicU64,
    /// Journey rows naming a station missing from the zone map
    unknown_stations: AtomicU64,
    /// Billed amount in cents, summed over users
    billed_cents_total: AtomicU64,
    bill_buckets: [AtomicU64; NUM_BILL_BUCKETS],
    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            users_billed: AtomicU64::new(0),
            journeys_total: AtomicU64::new(0),
            trips_total: AtomicU64::new(0),
            unmatched_entries: AtomicU64::new(0),
            unmatched_exits: AtomicU64::new(0),
            days_capped: AtomicU64::new(0),
            users_month_capped: AtomicU64::new(0),
            unknown_stations: AtomicU64::new(0),
            billed_cents_total: AtomicU64::new(0),
            bill_buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    /// Record journey rows read from input
    #[inline]
    pub fn record_journeys(&self, count: u64) {
        self.journeys_total.fetch_add(count, Ordering::Relaxed);
    }

    /// Record a journey row whose station is not in the zone map
    #[inline]
    pub fn record_unknown_station(&self) {
        self.unknown_stations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed user bill
    pub fn record_bill(&self, bill: &MonthlyBill) {
        self.users_billed.fetch_add(1, Ordering::Relaxed);
        self.trips_total.fetch_add(bill.trips, Ordering::Relaxed);
        self.unmatched_entries.fetch_add(bill.unmatched_entries, Ordering::Relaxed);
        self.unmatched_exits.fetch_add(bill.unmatched_exits, Ordering::Relaxed);
        self.days_capped.fetch_add(u64::try_from(bill.days_capped()).unwrap_or(u64::MAX), Ordering::Relaxed);
        if bill.is_capped() {
            self.users_month_capped.fetch_add(1, Ordering::Relaxed);
        }

        let cents = (bill.total * Money::ONE_HUNDRED).round().to_u64().unwrap_or(0);
        self.billed_cents_total.fetch_add(cents, Ordering::Relaxed);

        let bucket = bill_bucket_index(bill.total);
        self.bill_buckets[bucket].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn users_billed(&self) -> u64 {
        self.users_billed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn unknown_stations(&self) -> u64 {
        self.unknown_stations.load(Ordering::Relaxed)
    }

    /// Snapshot all counters
    pub fn report(&self) -> MetricsSummary {
        let users_billed = self.users_billed();
        let elapsed = self.started_at.elapsed();
        let elapsed_secs = elapsed.as_secs_f64();
        let users_per_sec = if elapsed_secs > 0.0 { users_billed as f64 / elapsed_secs } else { 0.0 };

        MetricsSummary {
            users_billed,
            journeys_total: self.journeys_total.load(Ordering::Relaxed),
            trips_total: self.trips_total.load(Ordering::Relaxed),
            unmatched_entries: self.unmatched_entries.load(Ordering::Relaxed),
            unmatched_exits: self.unmatched_exits.load(Ordering::Relaxed),
            days_capped: self.days_capped.load(Ordering::Relaxed),
            users_month_capped: self.users_month_capped.load(Ordering::Relaxed),
            unknown_stations: self.unknown_stations(),
            billed_total: Money::new(self.billed_cents_total.load(Ordering::Relaxed) as i64, 2),
            bill_buckets: std::array::from_fn(|i| self.bill_buckets[i].load(Ordering::Relaxed)),
            elapsed_ms: elapsed.as_millis() as u64,
            users_per_sec,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the run counters
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub users_billed: u64,
    pub journeys_total: u64,
    pub trips_total: u64,
    pub unmatched_entries: u64,
    pub unmatched_exits: u64,
    pub days_capped: u64,
    pub users_month_capped: u64,
    pub unknown_stations: u64,
    /// Sum of all billed amounts
    pub billed_total: Money,
    /// Billed-amount histogram
    /// Bounds: ≤5, ≤10, ≤15, ≤25, ≤50, ≤75, ≤100
    pub bill_buckets: [u64; NUM_BILL_BUCKETS],
    pub elapsed_ms: u64,
    pub users_per_sec: f64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            users = %self.users_billed,
            journeys = %self.journeys_total,
            trips = %self.trips_total,
            unmatched_entries = %self.unmatched_entries,
            unmatched_exits = %self.unmatched_exits,
            days_capped = %self.days_capped,
            users_month_capped = %self.users_month_capped,
            unknown_stations = %self.unknown_stations,
            billed_total = %self.billed_total,
            bill_buckets = ?self.bill_buckets,
            elapsed_ms = %self.elapsed_ms,
            users_per_sec = format!("{:.1}", self.users_per_sec),
            "billing_summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fare_calculator::DailyCharge;
    use rust_decimal_macros::dec;

    fn bill(total: Money, accrued: Money) -> MonthlyBill {
        MonthlyBill {
            total,
            days: vec![DailyCharge { day_of_month: 1, accrued, charged: accrued.min(dec!(15)) }],
            trips: 2,
            unmatched_entries: 1,
            unmatched_exits: 0,
        }
    }

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.users_billed(), 0);
        assert_eq!(metrics.unknown_stations(), 0);
    }

    #[test]
    fn test_bill_bucket_index() {
        assert_eq!(bill_bucket_index(dec!(0)), 0);
        assert_eq!(bill_bucket_index(dec!(3.30)), 0);
        assert_eq!(bill_bucket_index(dec!(5.00)), 0);
        assert_eq!(bill_bucket_index(dec!(5.01)), 1);
        assert_eq!(bill_bucket_index(dec!(15.00)), 2);
        assert_eq!(bill_bucket_index(dec!(18.30)), 3);
        assert_eq!(bill_bucket_index(dec!(100.00)), 6);
    }

    #[test]
    fn test_record_bill() {
        let metrics = Metrics::new();

        metrics.record_bill(&bill(dec!(3.30), dec!(3.30)));
        metrics.record_bill(&bill(dec!(15.00), dec!(18.00)));

        let summary = metrics.report();
        assert_eq!(summary.users_billed, 2);
        assert_eq!(summary.trips_total, 4);
        assert_eq!(summary.unmatched_entries, 2);
        assert_eq!(summary.days_capped, 1);
        assert_eq!(summary.users_month_capped, 0);
        assert_eq!(summary.billed_total, dec!(18.30));
        assert_eq!(summary.bill_buckets[0], 1);
        assert_eq!(summary.bill_buckets[2], 1);
    }

    #[test]
    fn test_record_journeys_and_unknown_stations() {
        let metrics = Metrics::new();

        metrics.record_journeys(12);
        metrics.record_unknown_station();
        metrics.record_unknown_station();

        let summary = metrics.report();
        assert_eq!(summary.journeys_total, 12);
        assert_eq!(summary.unknown_stations, 2);
    }
}
