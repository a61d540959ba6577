//! Transit billing - monthly fare capping for tap-in/tap-out journeys
//!
//! Reads a station to zone map and a month of taps, prices every rider's
//! trips with daily and monthly caps, and writes one amount per rider.
//!
//! Module structure:
//! - `domain/` - Core value types (Journey, Zone, UserId, errors)
//! - `io/` - Input and output files (zone map, journey data, bills)
//! - `services/` - Fare rules and billing orchestration
//! - `infra/` - Infrastructure (Config, Metrics)

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use transit_billing::infra::Config;
use transit_billing::services::BillingService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Transit billing - monthly capped fares per rider
#[derive(Parser, Debug)]
#[command(name = "transit-billing", version, about)]
struct Args {
    /// Station to zone CSV (overrides [input].zone_map)
    zone_map: Option<String>,

    /// Journey taps CSV (overrides [input].journey_data)
    journey_data: Option<String>,

    /// Billing CSV to write (overrides [output].file)
    output: Option<String>,

    /// Path to TOML configuration file
    ///
    /// Falls back to CONFIG_FILE, then config/billing.toml. A missing file
    /// means built-in defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(format: LogFormat) {
    // RUST_LOG controls verbosity; debug shows one line per rider
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_rev = env!("BILLING_GIT_REV"),
        "transit_billing_starting"
    );

    let config_path = Config::resolve_config_path(args.config.as_deref());
    let mut config = Config::load_from_path(&config_path);
    if let Some(path) = args.zone_map {
        config = config.with_zone_map(path);
    }
    if let Some(path) = args.journey_data {
        config = config.with_journey_data(path);
    }
    if let Some(path) = args.output {
        config = config.with_output_file(path);
    }

    info!(
        config_file = %config.config_file(),
        zone_map = %config.zone_map(),
        journey_data = %config.journey_data(),
        timestamp_format = %config.timestamp_format(),
        output = %config.output_file(),
        "config_loaded"
    );

    let service = BillingService::new(config);
    let result = service.process_billing().context("Error processing billing");
    service.metrics().report().log();

    let bills = result?;
    info!(users = %bills.len(), output = %service.config().output_file(), "transit_billing_complete");
    Ok(())
}
