// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Allan deviation of a frequency error series
//!
//! The estimator works on irregularly sampled logs. For each tau the series
//! is decimated to points spaced at least tau seconds apart, then the
//! two-sample deviation `sqrt(mean(diff^2) / 2)` of consecutive points is
//! taken. Points are neither averaged over the tau window nor overlapped,
//! so this is an approximation of the overlapping Allan deviation and is
//! not suitable for metrology-grade characterisation.

use std::collections::BTreeMap;

/// Tau values in seconds used when none are configured
pub const DEFAULT_TAU_VALUES: [u32; 4] = [1, 10, 100, 1000];

/// Indices of the samples kept when decimating to `tau` spacing
///
/// Starting at the first sample, a sample is kept when its elapsed time
/// reaches the running threshold, which then advances by `tau`.
pub fn resample_indices(elapsed: &[f64], tau: f64) -> Vec<usize> {
    let Some(&first) = elapsed.first() else {
        return Vec::new();
    };

    let mut threshold = first;
    let mut indices = Vec::new();
    for (i, &t) in elapsed.iter().enumerate() {
        if t >= threshold {
            indices.push(i);
            threshold += tau;
        }
    }
    indices
}

/// Allan deviation of `values` for a single `tau`
///
/// Returns exactly 0.0 when fewer than two points survive resampling.
/// Only the common prefix of `values` and `elapsed` is used.
pub fn allan_deviation(values: &[f64], elapsed: &[f64], tau: u32) -> f64 {
    let len = values.len().min(elapsed.len());
    let indices = resample_indices(&elapsed[..len], f64::from(tau));
    if indices.len() < 2 {
        return 0.0;
    }

    let sum_sq: f64 = indices
        .windows(2)
        .map(|pair| (values[pair[1]] - values[pair[0]]).powi(2))
        .sum();
    let mean_sq = sum_sq / (indices.len() - 1) as f64;

    (mean_sq / 2.0).sqrt()
}

/// Allan deviation for every tau in `taus`
pub fn allan_deviations(values: &[f64], elapsed: &[f64], taus: &[u32]) -> BTreeMap<u32, f64> {
    taus.iter()
        .map(|&tau| (tau, allan_deviation(values, elapsed, tau)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resample_indices_with_regular_spacing() {
        let elapsed: Vec<f64> = (0..25).map(|i| i as f64).collect();
        assert_eq!(resample_indices(&elapsed, 10.0), vec![0, 10, 20]);
    }

    #[test]
    fn test_resample_indices_with_gaps() {
        // The threshold advances by tau per kept sample, not to the sample time
        let elapsed = [0.0, 0.4, 5.0, 5.2, 6.1, 7.0];
        assert_eq!(resample_indices(&elapsed, 2.0), vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_constant_series_has_zero_deviation() {
        let elapsed: Vec<f64> = (0..120).map(|i| i as f64).collect();
        let values = vec![5e-9; 120];
        for (_, dev) in allan_deviations(&values, &elapsed, &DEFAULT_TAU_VALUES) {
            assert_eq!(dev, 0.0);
        }
    }

    #[test]
    fn test_alternating_series() {
        let elapsed: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let values: Vec<f64> = (0..11).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        // every first difference is +-2
        assert_relative_eq!(allan_deviation(&values, &elapsed, 1), 2.0_f64.sqrt());
        // every other point is identical
        assert_eq!(allan_deviation(&values, &elapsed, 2), 0.0);
    }

    #[test]
    fn test_tau_longer_than_series() {
        let elapsed = [0.0, 1.0, 2.0];
        let values = [1.0, 2.0, 3.0];
        assert_eq!(allan_deviation(&values, &elapsed, 1000), 0.0);
        assert_eq!(allan_deviation(&[], &[], 1), 0.0);
    }

    #[test]
    fn test_mismatched_lengths_use_common_prefix() {
        let elapsed = [0.0, 1.0, 2.0, 3.0, 4.0];
        let values = [1.0, 3.0, 5.0];
        assert_relative_eq!(allan_deviation(&values, &elapsed, 1), 2.0_f64.sqrt());
        let longer = [1.0, 3.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(allan_deviation(&longer, &elapsed[..3], 1), 2.0_f64.sqrt());
        assert_eq!(allan_deviation(&values, &[0.0], 1), 0.0);
    }
}
