// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use log::debug;

use super::Config;

/// JSON schema embedded at build time
const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

/// Output the embedded JSON schema to the console.
///
/// This function is called by the `show-config-schema` subcommand. It
/// outputs the full JSON schema for the configuration to stdout, formatted
/// for readability.
///
/// # Example
///
/// ```bash
/// ./rubidium-monitor show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let formatted_schema =
        serde_json::to_string_pretty(&config_schema()?).context("Failed to format JSON schema")?;
    println!("{}", formatted_schema);
    Ok(())
}

/// Parse the embedded configuration schema
pub fn config_schema() -> Result<serde_json::Value> {
    serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")
}

/// Validate a configuration document against the embedded schema.
///
/// # Arguments
///
/// * `document` - The configuration as a generic JSON value
pub fn validate_against_schema(document: &serde_json::Value) -> Result<()> {
    let schema = config_schema()?;
    let validator = jsonschema::draft202012::options()
        .should_validate_formats(true)
        .build(&schema)?;

    if let Err(error) = validator.validate(document) {
        anyhow::bail!("Configuration validation failed: {}", error);
    }
    Ok(())
}

/// Validates the configuration against rules the JSON schema cannot express.
///
/// # Validation Rules
///
/// - **Holdover limits**: minimum below maximum for duration and interval,
///   defaults inside their limits
/// - **Monitoring limits**: same checks for the monitoring interval
/// - **Tau values**: non-empty, no zero entry
/// - **Output**: `timestamp_format` is a valid strftime format
///
/// # Returns
///
/// * `Ok(())` if all validations pass
/// * `Err(anyhow::Error)` with descriptive message if any validation fails
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    let holdover = &config.holdover;
    if holdover.min_duration_s >= holdover.max_duration_s {
        anyhow::bail!(
            "holdover.min_duration_s ({}) must be below holdover.max_duration_s ({})",
            holdover.min_duration_s,
            holdover.max_duration_s
        );
    }
    if holdover.min_interval_s >= holdover.max_interval_s {
        anyhow::bail!(
            "holdover.min_interval_s ({}) must be below holdover.max_interval_s ({})",
            holdover.min_interval_s,
            holdover.max_interval_s
        );
    }
    if !(holdover.min_duration_s..=holdover.max_duration_s).contains(&holdover.default_duration_s)
    {
        anyhow::bail!(
            "holdover.default_duration_s ({}) is outside [{}, {}]",
            holdover.default_duration_s,
            holdover.min_duration_s,
            holdover.max_duration_s
        );
    }
    if !(holdover.min_interval_s..=holdover.max_interval_s).contains(&holdover.default_interval_s)
    {
        anyhow::bail!(
            "holdover.default_interval_s ({}) is outside [{}, {}]",
            holdover.default_interval_s,
            holdover.min_interval_s,
            holdover.max_interval_s
        );
    }

    let monitoring = &config.monitoring;
    if monitoring.min_interval_s > monitoring.max_interval_s
        || !(monitoring.min_interval_s..=monitoring.max_interval_s)
            .contains(&monitoring.default_interval_s)
    {
        anyhow::bail!(
            "monitoring.default_interval_s ({}) is outside [{}, {}]",
            monitoring.default_interval_s,
            monitoring.min_interval_s,
            monitoring.max_interval_s
        );
    }

    if config.analysis.tau_values.is_empty() {
        anyhow::bail!("analysis.tau_values must not be empty");
    }
    if config.analysis.tau_values.contains(&0) {
        anyhow::bail!("analysis.tau_values must not contain 0");
    }

    config.output.check_timestamp_format()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(validate_specific_rules(&config).is_ok());
        let document = serde_json::to_value(&config).unwrap();
        assert!(validate_against_schema(&document).is_ok());
    }

    #[test]
    fn test_inverted_holdover_limits() {
        let mut config = Config::default();
        config.holdover.min_interval_s = 60;
        config.holdover.max_interval_s = 1;
        assert!(validate_specific_rules(&config).is_err());
    }

    #[test]
    fn test_default_outside_limits() {
        let mut config = Config::default();
        config.holdover.default_duration_s = 10;
        assert!(validate_specific_rules(&config).is_err());
    }

    #[test]
    fn test_zero_tau_is_rejected() {
        let mut config = Config::default();
        config.analysis.tau_values = vec![1, 0];
        assert!(validate_specific_rules(&config).is_err());
        config.analysis.tau_values.clear();
        assert!(validate_specific_rules(&config).is_err());
    }

    #[test]
    fn test_invalid_timestamp_format_is_rejected() {
        let mut config = Config::default();
        config.output.timestamp_format = "run_%Q".to_string();
        assert!(validate_specific_rules(&config).is_err());
        config.output.timestamp_format = "%Y-%m-%dT%H%M".to_string();
        assert!(validate_specific_rules(&config).is_ok());
    }

    #[test]
    fn test_schema_rejects_unknown_section() {
        let document = serde_json::json!({ "visualization": { "port": 8080 } });
        assert!(validate_against_schema(&document).is_err());
    }
}
