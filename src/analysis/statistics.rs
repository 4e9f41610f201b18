// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Descriptive statistics for one measurement channel

use serde::{Deserialize, Serialize};

/// Summary statistics of a channel (frequency, temperature, ...)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Least-squares slope against elapsed time, in channel unit per second
    pub drift_rate: f64,
}

impl ChannelStats {
    /// Compute the statistics of `values` sampled at `elapsed` seconds
    ///
    /// Both slices must have the same, non-zero length.
    pub fn compute(values: &[f64], elapsed: &[f64]) -> Self {
        debug_assert_eq!(values.len(), elapsed.len());
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        Self {
            min,
            max,
            mean: mean(values),
            std_dev: population_std_dev(values),
            drift_rate: linear_slope(elapsed, values),
        }
    }
}

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation `sqrt(sum((x - mean)^2) / n)`
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ordinary least-squares slope of `y` against `x`
///
/// Returns 0.0 when `x` has no spread, since no line can be fitted.
pub fn linear_slope(x: &[f64], y: &[f64]) -> f64 {
    let x_mean = mean(x);
    let y_mean = mean(y);

    let (sxy, sxx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
            let dx = xi - x_mean;
            (sxy + dx * (yi - y_mean), sxx + dx * dx)
        });

    if sxx == 0.0 {
        0.0
    } else {
        sxy / sxx
    }
}
