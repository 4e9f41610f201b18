// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rubidium_monitor::config::Config;
use std::fs;
use std::sync::Once;
use tempfile::tempdir;

static INIT: Once = Once::new();

// Setup logger for tests
fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

#[test]
fn test_schema_error_creates_sample_file() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Valid YAML with wrong types and an unknown key
    let invalid_yaml = r#"
holdover:
  default_duration_s: "one hour"
analysis:
  tau_values: 10
  frequency_unit: ppm
unknown_section:
  key: value
"#;
    fs::write(&config_path, invalid_yaml)?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err(), "Config loading should have failed");

    let sample_path = config_path.with_extension("sample.yaml");
    assert!(sample_path.exists(), "Sample config file was not created");

    let sample_config = Config::from_file(&sample_path)?;
    assert_eq!(sample_config, Config::default());

    Ok(())
}

#[test]
fn test_rule_error_creates_sample_file() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("holdover.yaml");

    // Schema-valid, but the default duration lies outside the limits
    let invalid_config = r#"
holdover:
  min_duration_s: 300
  max_duration_s: 3600
  default_duration_s: 7200
"#;
    fs::write(&config_path, invalid_config)?;

    let err = Config::from_file(&config_path).unwrap_err();
    assert!(err.to_string().contains("default_duration_s"));
    assert!(temp_dir.path().join("holdover.sample.yaml").exists());

    Ok(())
}

#[test]
fn test_malformed_yaml_is_rejected() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "analysis: [unclosed")?;

    assert!(Config::from_file(&config_path).is_err());
    Ok(())
}

#[test]
fn test_invalid_timestamp_format_is_rejected_on_load() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "output:\n  timestamp_format: \"%Q\"\n")?;

    let err = Config::from_file(&config_path).unwrap_err();
    assert!(err.to_string().contains("timestamp_format"));
    assert!(config_path.with_extension("sample.yaml").exists());

    Ok(())
}
