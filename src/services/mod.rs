//! Services - fare rules and billing orchestration
//!
//! - `zone_pricing` - per-zone surcharge table
//! - `fare_calculator` - per-rider daily and monthly capping state machine
//! - `billing` - bills all riders and drives the read/compute/write pipeline

pub mod billing;
pub mod fare_calculator;
pub mod zone_pricing;

// Re-export commonly used types
pub use billing::{bill_users, BillingService};
pub use fare_calculator::{compute_monthly_bill, FareCalculator, MonthlyBill};
pub use zone_pricing::additional_cost;
