// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Measurement records
//!
//! A [`Measurement`] is one normalized sample of the reference module:
//! frequency error, temperature, supply voltage, supply current and the
//! lock status label, stamped with a time in seconds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a single holdover measurement
///
/// Records are produced either by the log parser or by polling a device,
/// and are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Time of the sample in seconds (epoch or elapsed, per source)
    pub timestamp: f64,

    /// Fractional frequency offset (dimensionless)
    pub frequency_error: f64,

    /// Module temperature in °C
    pub temperature: f64,

    /// Supply voltage in V
    pub voltage: f64,

    /// Supply current in A
    pub current: f64,

    /// Status label reported by the module, e.g. `LOCKED`
    pub status: String,
}

impl Measurement {
    /// Returns true when every numeric field is finite
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite()
            && self.frequency_error.is_finite()
            && self.temperature.is_finite()
            && self.voltage.is_finite()
            && self.current.is_finite()
    }

    /// Render the record in the canonical comma-separated log line format
    ///
    /// The output is accepted by [`crate::log_parser::parse_line`] and
    /// parses back to an identical record. The timestamp must not be
    /// negative.
    pub fn to_log_line(&self) -> String {
        format!(
            "{},{:e},{},{},{},{}",
            self.timestamp,
            self.frequency_error,
            self.temperature,
            self.voltage,
            self.current,
            self.status
        )
    }
}

/// Unit of the frequency error column in a log
///
/// Some firmware variants report the phase offset in nanoseconds instead
/// of a fractional frequency offset. Values in [`FrequencyUnit::PhaseNs`]
/// are divided by 1e9 on ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyUnit {
    /// Dimensionless fractional offset, used as-is
    #[default]
    Fractional,
    /// Phase in nanoseconds
    PhaseNs,
}

impl FrequencyUnit {
    /// Convert a raw column value to a fractional frequency offset
    pub fn to_fractional(self, raw: f64) -> f64 {
        match self {
            FrequencyUnit::Fractional => raw,
            FrequencyUnit::PhaseNs => raw / 1e9,
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyUnit::Fractional => write!(f, "fractional"),
            FrequencyUnit::PhaseNs => write!(f, "phase_ns"),
        }
    }
}

impl std::str::FromStr for FrequencyUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fractional" => Ok(FrequencyUnit::Fractional),
            "phase_ns" | "phase-ns" => Ok(FrequencyUnit::PhaseNs),
            other => Err(format!(
                "unknown frequency unit '{}', expected 'fractional' or 'phase_ns'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ns_is_scaled() {
        assert_eq!(FrequencyUnit::Fractional.to_fractional(12.5), 12.5);
        assert_eq!(FrequencyUnit::PhaseNs.to_fractional(500.0), 5e-7);
    }

    #[test]
    fn test_frequency_unit_from_str() {
        assert_eq!(
            "phase_ns".parse::<FrequencyUnit>().unwrap(),
            FrequencyUnit::PhaseNs
        );
        assert!("ppm".parse::<FrequencyUnit>().is_err());
    }

    #[test]
    fn test_log_line_is_lossless() {
        let m = Measurement {
            timestamp: 12.000123456,
            frequency_error: -1.2345678901234e-11,
            temperature: 35.123456789,
            voltage: 11.99999999,
            current: 0.5512345678,
            status: "HOLDOVER".to_string(),
        };
        let parsed = crate::log_parser::parse_line(&m.to_log_line()).unwrap();
        assert_eq!(parsed, m);

        let whole = Measurement {
            timestamp: 18.0,
            temperature: -3.0,
            ..m
        };
        let line = whole.to_log_line();
        assert_eq!(line, "18,-1.2345678901234e-11,-3,11.99999999,0.5512345678,HOLDOVER");
        assert_eq!(crate::log_parser::parse_line(&line), Some(whole));
    }

    #[test]
    fn test_non_finite_detection() {
        let mut m = Measurement {
            timestamp: 1.0,
            frequency_error: 1e-9,
            temperature: 25.0,
            voltage: 12.0,
            current: 0.5,
            status: "LOCKED".to_string(),
        };
        assert!(m.is_finite());
        m.voltage = f64::NAN;
        assert!(!m.is_finite());
    }
}
