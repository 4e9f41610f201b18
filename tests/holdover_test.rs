// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use approx::assert_relative_eq;
use rubidium_monitor::analysis::analyze_log;
use rubidium_monitor::config::{Config, HoldoverConfig, SimulationConfig};
use rubidium_monitor::device::SimulatedDevice;
use rubidium_monitor::holdover::{HoldoverPlan, HoldoverTest};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn short_run_config() -> Config {
    Config {
        holdover: HoldoverConfig {
            min_duration_s: 1,
            max_duration_s: 600,
            default_duration_s: 10,
            min_interval_s: 1,
            max_interval_s: 10,
            default_interval_s: 1,
        },
        simulation: SimulationConfig {
            drift_per_second: 1e-12,
            seed: Some(2025),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_simulated_holdover_run() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = short_run_config();
    let plan = HoldoverPlan {
        duration: Duration::from_secs(20),
        interval: Duration::from_secs(2),
        output: temp_dir.path().join("runs").join("holdover.json"),
    };

    let device = SimulatedDevice::new(config.simulation.clone());
    let mut test = HoldoverTest::new(device, &config);
    let outcome = test.run(&plan).await?;

    assert_eq!(outcome.measurements.len(), 10);
    assert_eq!(outcome.result.measurement_count, 10);
    assert_relative_eq!(outcome.result.duration, 18.0, max_relative = 1e-9);
    assert_eq!(outcome.result.primary_status, "HOLDOVER");
    assert_eq!(outcome.alerted_samples, 0);
    assert!(!test.into_device().in_holdover());

    // The raw log re-analyzes to exactly the in-run result
    assert_eq!(outcome.log_path, temp_dir.path().join("runs").join("holdover.log"));
    let reanalyzed = analyze_log(&outcome.log_path, &config.analysis)?;
    assert!(reanalyzed.unparsed.is_empty());
    assert_eq!(reanalyzed.result, outcome.result);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&outcome.json_path)?)?;
    assert!(json["start_time"].is_string());
    assert_eq!(json["measurements"].as_array().map(Vec::len), Some(10));
    assert_eq!(json["results"]["measurement_count"], 10);
    assert_eq!(json["interval_s"], 2.0);

    let summary = fs::read_to_string(&outcome.summary_path)?;
    assert!(summary.contains("Holdover Test Analysis Report"));
    assert_eq!(
        outcome.summary_path,
        temp_dir.path().join("runs").join("holdover_summary.txt")
    );

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failed_run_leaves_holdover() -> Result<()> {
    let temp_dir = tempdir()?;
    let config = short_run_config();
    let plan = HoldoverPlan {
        duration: Duration::from_secs(10),
        interval: Duration::from_secs(1),
        output: temp_dir.path().join("failed.json"),
    };

    // Each sample performs five reads, the third sample fails
    let device = SimulatedDevice::new(config.simulation.clone()).with_failure_after(12);
    let mut test = HoldoverTest::new(device, &config);
    assert!(test.run(&plan).await.is_err());

    assert!(!test.into_device().in_holdover());
    assert!(!temp_dir.path().join("failed.json").exists());
    // Samples taken before the failure are kept in the log
    let log = fs::read_to_string(temp_dir.path().join("failed.log"))?;
    assert_eq!(log.lines().filter(|l| !l.starts_with('#')).count(), 2);

    Ok(())
}
