//! End-to-end billing runs over CSV fixtures

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;
use transit_billing::infra::Config;
use transit_billing::services::BillingService;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn config_for(zone_map: &Path, journey_data: &Path, output: &Path) -> Config {
    Config::default()
        .with_zone_map(zone_map.to_str().unwrap())
        .with_journey_data(journey_data.to_str().unwrap())
        .with_output_file(output.to_str().unwrap())
}

#[test]
fn test_process_billing_golden_output() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("bills.csv");
    let service = BillingService::new(config_for(
        &fixture("zone_map.csv"),
        &fixture("journey_data.csv"),
        &output,
    ));

    let bills = service.process_billing().unwrap();

    assert_eq!(bills.len(), 3);
    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    assert_eq!(lines, vec!["user1,3.30", "user2,5.00", "user3,18.30"]);

    let summary = service.metrics().report();
    assert_eq!(summary.users_billed, 3);
    assert_eq!(summary.journeys_total, 15);
    assert_eq!(summary.trips_total, 7);
    assert_eq!(summary.unmatched_exits, 1);
    assert_eq!(summary.days_capped, 1);
    assert_eq!(summary.unknown_stations, 0);
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    for output in [&first, &second] {
        BillingService::new(config_for(
            &fixture("zone_map.csv"),
            &fixture("journey_data.csv"),
            output,
        ))
        .process_billing()
        .unwrap();
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_unknown_station_aborts_without_output() {
    let dir = tempdir().unwrap();
    let journeys = dir.path().join("journeys.csv");
    let output = dir.path().join("bills.csv");
    fs::write(
        &journeys,
        "user_id,station,direction,time\n\
         alice,Algate,IN,2024-06-03T08:00:00\n\
         alice,Atlantis,OUT,2024-06-03T08:30:00\n",
    )
    .unwrap();

    let service = BillingService::new(config_for(&fixture("zone_map.csv"), &journeys, &output));
    let err = service.process_billing().unwrap_err();

    let chain = format!("{:#}", err);
    assert!(chain.contains("failed to bill user alice"), "{}", chain);
    assert!(chain.contains("invalid zone: 0"), "{}", chain);
    assert!(!output.exists());
    assert_eq!(service.metrics().unknown_stations(), 1);
}

#[test]
fn test_malformed_timestamp_aborts_before_billing() {
    let dir = tempdir().unwrap();
    let journeys = dir.path().join("journeys.csv");
    let output = dir.path().join("bills.csv");
    fs::write(&journeys, "user_id,station,direction,time\nbob,Algate,IN,03/06/2024\n").unwrap();

    let service = BillingService::new(config_for(&fixture("zone_map.csv"), &journeys, &output));
    let err = service.process_billing().unwrap_err();

    let chain = format!("{:#}", err);
    assert!(chain.contains("malformed timestamp"), "{}", chain);
    assert!(!output.exists());
    assert_eq!(service.metrics().users_billed(), 0);
}

#[test]
fn test_missing_zone_map_is_io_failure() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.csv");
    let output = dir.path().join("bills.csv");

    let service =
        BillingService::new(config_for(&missing, &fixture("journey_data.csv"), &output));
    let err = service.process_billing().unwrap_err();

    assert!(err.to_string().contains("Failed to open zone map"));
    assert!(!output.exists());
}

#[test]
fn test_bills_stay_within_monthly_cap() {
    let dir = tempdir().unwrap();
    let journeys = dir.path().join("journeys.csv");
    let output = dir.path().join("bills.csv");

    // 20 days of six zone-1 trips each: 15.00 a day, 300.00 uncapped
    let mut rows = String::from("user_id,station,direction,time\n");
    for day in 1..=20 {
        for hour in 0..6 {
            rows.push_str(&format!("commuter,Algate,IN,2024-06-{day:02}T{:02}:00:00\n", hour * 2));
            rows.push_str(&format!("commuter,Holborn,OUT,2024-06-{day:02}T{:02}:30:00\n", hour * 2));
        }
    }
    fs::write(&journeys, rows).unwrap();

    let service = BillingService::new(config_for(&fixture("zone_map.csv"), &journeys, &output));
    service.process_billing().unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), "commuter,100.00\n");
    let summary = service.metrics().report();
    assert_eq!(summary.days_capped, 20);
    assert_eq!(summary.users_month_capped, 1);
}
