// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Alert thresholds applied to live samples

use serde::{Deserialize, Serialize};

/// Thresholds checked against every sample read from the device.
///
/// A sample raises an alert when the absolute frequency error, the
/// temperature, the voltage or the current exceeds its threshold, or when
/// its status label is listed in `status_alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Enable or disable alerting. Default is `true`.
    pub enabled: bool,
    /// Maximum absolute fractional frequency error. Default is 1e-8.
    pub frequency_error_threshold: f64,
    /// Maximum temperature in °C. Default is 50.
    pub temperature_threshold: f64,
    /// Maximum supply voltage in V. Default is 15.
    pub voltage_threshold: f64,
    /// Maximum supply current in A. Default is 2.
    pub current_threshold: f64,
    /// Status labels that always raise an alert.
    pub status_alerts: Vec<String>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency_error_threshold: 1e-8,
            temperature_threshold: 50.0,
            voltage_threshold: 15.0,
            current_threshold: 2.0,
            status_alerts: vec!["ERROR".to_string(), "NOT_LOCKED".to_string()],
        }
    }
}
