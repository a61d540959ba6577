//! Fare calculator - turns one rider's taps into a capped monthly charge
//!
//! A single forward pass over the rider's journeys, in input order:
//! - IN pushes the entry zone onto a pending stack
//! - OUT pops the most recent entry (LIFO) and charges base fare plus the
//!   entry and exit zone surcharges; an OUT with nothing pending is a flat
//!   penalty
//! - a change of day-of-month closes the running day at the daily cap
//! - entries still pending after the last journey are each a flat penalty
//!   on the final day
//!
//! The month total is the sum of capped days, itself capped.

use crate::domain::{Direction, FareError, Journey, Money, Zone};
use crate::services::zone_pricing::additional_cost;
use rust_decimal_macros::dec;
use smallvec::SmallVec;
use tracing::trace;

/// Flat fare for every completed trip, before zone surcharges
pub const BASE_FARE: Money = dec!(2.00);

/// Charged for a tap-out with no entry, or a tap-in never closed
pub const UNMATCHED_TAP_PENALTY: Money = dec!(5.00);

/// Ceiling on a single day's charges
pub const DAILY_CAP: Money = dec!(15.00);

/// Ceiling on the sum of capped days
pub const MONTHLY_CAP: Money = dec!(100.00);

/// Fare for a completed trip from `entry` to `exit`
///
/// The entry zone is priced first, so when both are invalid the error names
/// the entry zone.
pub fn trip_fare(entry: Zone, exit: Zone) -> Result<Money, FareError> {
    Ok(BASE_FARE + additional_cost(entry)? + additional_cost(exit)?)
}

/// Charges for one run of consecutive journeys sharing a day-of-month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCharge {
    pub day_of_month: u32,
    /// Sum of fares and penalties before the daily cap
    pub accrued: Money,
    /// What the day contributes to the month
    pub charged: Money,
}

impl DailyCharge {
    #[inline]
    pub fn is_capped(&self) -> bool {
        self.accrued > self.charged
    }
}

/// A rider's month: the billed total plus how it was reached
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyBill {
    pub total: Money,
    pub days: Vec<DailyCharge>,
    pub trips: u64,
    pub unmatched_entries: u64,
    pub unmatched_exits: u64,
}

impl MonthlyBill {
    /// Sum of capped days, before the monthly cap
    pub fn uncapped_total(&self) -> Money {
        self.days.iter().map(|d| d.charged).sum()
    }

    pub fn is_capped(&self) -> bool {
        self.uncapped_total() > self.total
    }

    pub fn days_capped(&self) -> usize {
        self.days.iter().filter(|d| d.is_capped()).count()
    }
}

/// Streaming fare state for a single rider
///
/// Feed journeys in order with `apply`, then call `finish`.
#[derive(Debug)]
pub struct FareCalculator {
    /// Entry zones waiting for a tap-out. Not cleared at day changes.
    pending_entries: SmallVec<[Zone; 4]>,
    current_day: Option<u32>,
    daily_total: Money,
    monthly_total: Money,
    bill: MonthlyBill,
}

impl FareCalculator {
    pub fn new() -> Self {
        Self {
            pending_entries: SmallVec::new(),
            current_day: None,
            daily_total: Money::ZERO,
            monthly_total: Money::ZERO,
            bill: MonthlyBill::default(),
        }
    }

    /// Process the next journey in the rider's sequence
    ///
    /// An invalid zone on a completed trip is fatal for the whole bill; the
    /// calculator should be dropped after an error.
    pub fn apply(&mut self, journey: &Journey) -> Result<(), FareError> {
        let day = journey.day_of_month();
        match self.current_day {
            Some(current) if current != day => {
                self.close_day(current);
                self.current_day = Some(day);
            }
            Some(_) => {}
            None => self.current_day = Some(day),
        }

        match journey.direction() {
            Direction::In => self.pending_entries.push(journey.zone()),
            Direction::Out => match self.pending_entries.pop() {
                Some(entry) => {
                    let fare = trip_fare(entry, journey.zone())?;
                    trace!(entry = %entry, exit = %journey.zone(), fare = %fare, "trip_priced");
                    self.daily_total += fare;
                    self.bill.trips += 1;
                }
                None => {
                    trace!(exit = %journey.zone(), "unmatched_exit");
                    self.daily_total += UNMATCHED_TAP_PENALTY;
                    self.bill.unmatched_exits += 1;
                }
            },
        }

        Ok(())
    }

    /// Penalize leftover entries, close the last day, and apply the monthly cap
    pub fn finish(mut self) -> MonthlyBill {
        let Some(last_day) = self.current_day else {
            return self.bill;
        };

        let leftover = u64::try_from(self.pending_entries.len()).unwrap_or(u64::MAX);
        if leftover > 0 {
            trace!(count = leftover, "unmatched_entries");
            self.daily_total += UNMATCHED_TAP_PENALTY * Money::from(leftover);
            self.bill.unmatched_entries = self.bill.unmatched_entries.saturating_add(leftover);
        }

        self.close_day(last_day);
        self.bill.total = self.monthly_total.min(MONTHLY_CAP);
        self.bill
    }

    fn close_day(&mut self, day_of_month: u32) {
        let charged = self.daily_total.min(DAILY_CAP);
        self.monthly_total += charged;
        self.bill.days.push(DailyCharge { day_of_month, accrued: self.daily_total, charged });
        self.daily_total = Money::ZERO;
    }
}

impl Default for FareCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Full breakdown of a rider's month
pub fn bill_journeys(journeys: &[Journey]) -> Result<MonthlyBill, FareError> {
    let mut calculator = FareCalculator::new();
    for journey in journeys {
        calculator.apply(journey)?;
    }
    Ok(calculator.finish())
}

/// Capped monthly amount for one rider's ordered journeys
///
/// An empty sequence bills 0.
pub fn compute_monthly_bill(journeys: &[Journey]) -> Result<Money, FareError> {
    Ok(bill_journeys(journeys)?.total)
}
