//! Infrastructure - configuration and run metrics
//!
//! - `config` - Application configuration (TOML loading, defaults, CLI overrides)
//! - `metrics` - Lock-free run counters and the end-of-run summary

pub mod config;
pub mod metrics;

// Re-export commonly used types
pub use config::Config;
pub use metrics::{Metrics, MetricsSummary};
