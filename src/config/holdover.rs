// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Holdover test and live monitoring configuration

use serde::{Deserialize, Serialize};

/// Limits and defaults for holdover test runs.
///
/// A requested run is rejected when its duration or sampling interval
/// falls outside the `min`/`max` bounds below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoldoverConfig {
    /// Shortest accepted test duration in seconds. Default is 300 (5 minutes).
    pub min_duration_s: u64,
    /// Longest accepted test duration in seconds. Default is 86400 (24 hours).
    pub max_duration_s: u64,
    /// Duration used when none is requested. Default is 3600.
    pub default_duration_s: u64,
    /// Shortest accepted sampling interval in seconds. Default is 1.
    pub min_interval_s: u64,
    /// Longest accepted sampling interval in seconds. Default is 60.
    pub max_interval_s: u64,
    /// Sampling interval used when none is requested. Default is 10.
    pub default_interval_s: u64,
}

impl Default for HoldoverConfig {
    fn default() -> Self {
        Self {
            min_duration_s: 300,
            max_duration_s: 86400,
            default_duration_s: 3600,
            min_interval_s: 1,
            max_interval_s: 60,
            default_interval_s: 10,
        }
    }
}

/// Polling settings for the live monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub default_interval_s: u64,
    pub min_interval_s: u64,
    pub max_interval_s: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            default_interval_s: 10,
            min_interval_s: 1,
            max_interval_s: 3600,
        }
    }
}
