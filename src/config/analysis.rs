// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Stability analysis configuration
//!
//! This module defines the settings used when analyzing holdover logs:
//! the Allan deviation tau set, the unit of the frequency error column
//! and the thresholds a run must meet to be considered stable.

use crate::analysis::DEFAULT_TAU_VALUES;
use crate::measurement::FrequencyUnit;
use serde::{Deserialize, Serialize};

/// Configuration for holdover log analysis.
///
/// # Example
///
/// ```
/// use rubidium_monitor::config::AnalysisConfig;
/// use rubidium_monitor::measurement::FrequencyUnit;
///
/// let analysis = AnalysisConfig {
///     tau_values: vec![1, 10, 100],
///     frequency_unit: FrequencyUnit::PhaseNs,
///     ..Default::default()
/// };
/// assert_eq!(analysis.frequency_stability_threshold, 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Allan deviation averaging intervals in seconds.
    ///
    /// Default is `[1, 10, 100, 1000]`. Every value must be at least 1.
    pub tau_values: Vec<u32>,

    /// Unit of the frequency error column in ingested logs.
    ///
    /// `fractional` keeps values as written, `phase_ns` divides them by 1e9.
    pub frequency_unit: FrequencyUnit,

    /// Maximum standard deviation of the frequency error for a stable run.
    pub frequency_stability_threshold: f64,

    /// Maximum temperature standard deviation in °C for a stable run.
    pub temperature_stability_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tau_values: DEFAULT_TAU_VALUES.to_vec(),
            frequency_unit: FrequencyUnit::Fractional,
            frequency_stability_threshold: 1e-9,
            temperature_stability_threshold: 0.1,
        }
    }
}
