// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Threshold alerts on live samples

use crate::config::AlertsConfig;
use crate::measurement::Measurement;
use serde::Serialize;
use std::fmt;

/// A threshold crossed by one sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    FrequencyError { value: f64, threshold: f64 },
    Temperature { value: f64, threshold: f64 },
    Voltage { value: f64, threshold: f64 },
    Current { value: f64, threshold: f64 },
    Status { status: String },
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alert::FrequencyError { value, threshold } => write!(
                f,
                "frequency error {:.2e} exceeds ±{:.2e}",
                value, threshold
            ),
            Alert::Temperature { value, threshold } => {
                write!(f, "temperature {:.2}°C exceeds {:.2}°C", value, threshold)
            }
            Alert::Voltage { value, threshold } => {
                write!(f, "voltage {:.2}V exceeds {:.2}V", value, threshold)
            }
            Alert::Current { value, threshold } => {
                write!(f, "current {:.3}A exceeds {:.3}A", value, threshold)
            }
            Alert::Status { status } => write!(f, "status {}", status),
        }
    }
}

/// Check one sample against the alert thresholds
///
/// Returns an empty list when alerting is disabled.
pub fn check_measurement(measurement: &Measurement, config: &AlertsConfig) -> Vec<Alert> {
    if !config.enabled {
        return Vec::new();
    }

    let mut alerts = Vec::new();
    if measurement.frequency_error.abs() > config.frequency_error_threshold {
        alerts.push(Alert::FrequencyError {
            value: measurement.frequency_error,
            threshold: config.frequency_error_threshold,
        });
    }
    if measurement.temperature > config.temperature_threshold {
        alerts.push(Alert::Temperature {
            value: measurement.temperature,
            threshold: config.temperature_threshold,
        });
    }
    if measurement.voltage > config.voltage_threshold {
        alerts.push(Alert::Voltage {
            value: measurement.voltage,
            threshold: config.voltage_threshold,
        });
    }
    if measurement.current > config.current_threshold {
        alerts.push(Alert::Current {
            value: measurement.current,
            threshold: config.current_threshold,
        });
    }
    if config
        .status_alerts
        .iter()
        .any(|s| s == &measurement.status)
    {
        alerts.push(Alert::Status {
            status: measurement.status.clone(),
        });
    }
    alerts
}
