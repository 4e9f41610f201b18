// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the rubidium monitor
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings. The configuration is backed by a YAML file and
//! validated against a JSON schema for robustness.
//!
//! ## Configuration Structure
//!
//! The configuration is organized as a nested structure with sections:
//! - `simulation`: Parameters of the simulated reference module
//! - `monitoring`: Live monitor polling interval and limits
//! - `holdover`: Holdover test duration and interval limits
//! - `analysis`: Allan deviation taus, frequency unit, stability thresholds
//! - `alerts`: Per-sample alert thresholds
//! - `output`: Result file location
//!
//! The loaded [`Config`] is passed explicitly to the components that need
//! it; nothing reads configuration from global state.
//!
//! ## Usage
//!
//! ```no_run
//! use rubidium_monitor::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some(vec![1, 10, 100]), // Tau values
//!     None,                   // Frequency unit
//!     Some(42),               // Simulation seed
//! );
//!
//! // Dotted-path access for user interfaces
//! let taus = config.get_path("analysis.tau_values");
//! ```

pub mod alerts;
pub mod analysis;
pub mod holdover;
pub mod output;
pub mod simulation;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::measurement::FrequencyUnit;

// Re-export all types for public API
pub use alerts::AlertsConfig;
pub use analysis::AnalysisConfig;
pub use holdover::{HoldoverConfig, MonitoringConfig};
pub use output::OutputConfig;
pub use simulation::SimulationConfig;
pub use utils::{output_config_schema, validate_against_schema, validate_specific_rules};

/// Root configuration structure for the rubidium monitor.
///
/// # Default Values
///
/// Each section uses default values when not explicitly specified in the
/// configuration file, allowing for minimal configuration when custom
/// settings are not required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Simulated device parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Live monitoring settings.
    #[serde(default)]
    pub monitoring: MonitoringConfig,

    /// Holdover test limits and defaults.
    ///
    /// Requested runs outside these limits are rejected before the device
    /// is put into holdover.
    #[serde(default)]
    pub holdover: HoldoverConfig,

    /// Log analysis settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub alerts: AlertsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Original path: {:?}, Sample path: {:?}", path, sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with default values. A file that fails
    /// schema validation, deserialization or the additional rules is
    /// rejected, and a `<name>.sample.yaml` holding the defaults is written
    /// next to it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // An empty document is a valid, all-default configuration
        let yaml_value: serde_yml::Value = if contents.trim().is_empty() {
            serde_yml::Value::Mapping(Default::default())
        } else {
            serde_yml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?
        };

        let json_value = serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(err) = validate_against_schema(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            return Err(err);
        }

        let config: Config = match serde_json::from_value(json_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values that are explicitly provided override the existing
    /// configuration.
    ///
    /// # Parameters
    ///
    /// * `tau_values` - Allan deviation intervals in seconds
    /// * `frequency_unit` - Unit of the frequency error column in logs
    /// * `seed` - Random seed of the simulated device
    pub fn apply_args(
        &mut self,
        tau_values: Option<Vec<u32>>,
        frequency_unit: Option<FrequencyUnit>,
        seed: Option<u64>,
    ) {
        if let Some(taus) = tau_values {
            debug!("Overriding tau values from command line: {:?}", taus);
            self.analysis.tau_values = taus;
        }
        if let Some(unit) = frequency_unit {
            debug!("Overriding frequency unit from command line: {}", unit);
            self.analysis.frequency_unit = unit;
        }
        if let Some(seed) = seed {
            debug!("Overriding simulation seed from command line: {}", seed);
            self.simulation.seed = Some(seed);
        }
    }

    /// Read a value by dotted path, e.g. `holdover.default_duration_s`
    ///
    /// Returns `None` when the path does not name a configuration entry.
    pub fn get_path(&self, key_path: &str) -> Option<serde_json::Value> {
        let document = serde_json::to_value(self).ok()?;
        document.pointer(&to_json_pointer(key_path)).cloned()
    }

    /// Set a value by dotted path
    ///
    /// The entry must already exist. The updated configuration is checked
    /// against the schema and the additional rules before it replaces the
    /// current one; on failure `self` is left untouched.
    pub fn set_path(&mut self, key_path: &str, value: serde_json::Value) -> Result<()> {
        let mut document =
            serde_json::to_value(&*self).context("Failed to serialize configuration")?;

        let slot = document
            .pointer_mut(&to_json_pointer(key_path))
            .with_context(|| format!("Unknown configuration key: {}", key_path))?;
        *slot = value;

        validate_against_schema(&document)?;
        let updated: Config = serde_json::from_value(document)
            .with_context(|| format!("Invalid value for {}", key_path))?;
        validate_specific_rules(&updated)?;

        debug!("Configuration key {} updated", key_path);
        *self = updated;
        Ok(())
    }
}

fn to_json_pointer(key_path: &str) -> String {
    key_path
        .split('.')
        .filter(|segment| !segment.is_empty())
        .fold(String::new(), |mut pointer, segment| {
            pointer.push('/');
            pointer.push_str(&segment.replace('~', "~0").replace('/', "~1"));
            pointer
        })
}
