// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Simulated reference module configuration
//!
//! These settings drive [`SimulatedDevice`](crate::device::SimulatedDevice),
//! which stands in for real hardware during development and tests.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fractional frequency offset at start of run
    pub frequency_offset: f64,
    /// Frequency drift per second while in holdover
    pub drift_per_second: f64,
    /// Peak amplitude of the uniform frequency noise
    pub frequency_noise: f64,
    /// Temperature in °C around which readings vary
    pub nominal_temperature: f64,
    /// Peak amplitude of the uniform temperature noise in °C
    pub temperature_noise: f64,
    pub nominal_voltage: f64,
    pub nominal_current: f64,
    /// Random seed, a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frequency_offset: 1e-11,
            drift_per_second: 1e-14,
            frequency_noise: 2e-12,
            nominal_temperature: 35.0,
            temperature_noise: 0.05,
            nominal_voltage: 12.0,
            nominal_current: 0.55,
            seed: None,
        }
    }
}
