// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Holdover stability analysis
//!
//! This module computes the stability figures of a holdover run from an
//! ordered sequence of [`Measurement`] records:
//!
//! - min / max / mean / population standard deviation per channel
//! - linear drift rate per channel
//! - Allan deviation of the frequency error for a set of tau values
//! - distribution of the status labels
//!
//! ## Time basis
//!
//! All computations use the elapsed time relative to the first record,
//! `elapsed[i] = timestamp[i] - timestamp[0]`, whatever the origin of the
//! timestamps (Unix epoch or seconds since test start). Timestamps are not
//! checked for monotonicity; an unordered log still yields a result.
//!
//! ## Usage
//!
//! ```no_run
//! use rubidium_monitor::analysis::{analyze_log, report::format_report};
//! use rubidium_monitor::config::AnalysisConfig;
//!
//! let analysis = analyze_log("holdover.log", &AnalysisConfig::default()).unwrap();
//! println!("{}", format_report(&analysis.result));
//! ```

pub mod allan;
pub mod report;
pub mod statistics;

pub use allan::DEFAULT_TAU_VALUES;
pub use statistics::ChannelStats;

use crate::config::AnalysisConfig;
use crate::error::HoldoverError;
use crate::log_parser::{LogIngestor, UnparsedLine};
use crate::measurement::Measurement;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Result of a holdover stability analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Elapsed time between the first and the last record, in seconds
    pub duration: f64,
    pub measurement_count: usize,
    /// Average spacing between records, in seconds
    pub measurement_interval: f64,

    pub frequency: ChannelStats,
    pub temperature: ChannelStats,
    pub voltage: ChannelStats,
    pub current: ChannelStats,

    /// Allan deviation at tau = 1 s, 0.0 when not computed
    pub allan_deviation: f64,
    /// Allan deviation per tau in seconds
    pub allan_deviations: BTreeMap<u32, f64>,

    pub status_distribution: BTreeMap<String, usize>,
    /// Most frequent status label
    pub primary_status: String,
}

impl AnalysisResult {
    /// Frequency stability, i.e. the standard deviation of the frequency error
    pub fn freq_stability(&self) -> f64 {
        self.frequency.std_dev
    }

    /// Temperature stability, i.e. the standard deviation of the temperature
    pub fn temp_stability(&self) -> f64 {
        self.temperature.std_dev
    }
}

/// Analyze an ordered sequence of records
///
/// `taus` lists the Allan deviation intervals in seconds; pass
/// [`DEFAULT_TAU_VALUES`] for the usual 1/10/100/1000 s curve.
///
/// # Errors
///
/// [`HoldoverError::InsufficientData`] when fewer than two records are given.
pub fn analyze(records: &[Measurement], taus: &[u32]) -> Result<AnalysisResult, HoldoverError> {
    if records.len() < 2 {
        return Err(HoldoverError::InsufficientData {
            found: records.len(),
        });
    }

    let origin = records[0].timestamp;
    let elapsed: Vec<f64> = records.iter().map(|m| m.timestamp - origin).collect();
    let channel = |f: fn(&Measurement) -> f64| -> Vec<f64> { records.iter().map(f).collect() };

    let frequency = channel(|m| m.frequency_error);
    let temperature = channel(|m| m.temperature);
    let voltage = channel(|m| m.voltage);
    let current = channel(|m| m.current);

    let duration = elapsed[elapsed.len() - 1] - elapsed[0];
    let allan_deviations = allan::allan_deviations(&frequency, &elapsed, taus);
    let allan_deviation = allan_deviations.get(&1).copied().unwrap_or(0.0);

    let mut status_distribution = BTreeMap::new();
    for m in records {
        *status_distribution.entry(m.status.clone()).or_insert(0usize) += 1;
    }
    let primary_status = primary_status(&status_distribution);

    debug!(
        "Analyzed {} records over {:.2}s, primary status {}",
        records.len(),
        duration,
        primary_status
    );

    Ok(AnalysisResult {
        duration,
        measurement_count: records.len(),
        measurement_interval: duration / (records.len() - 1) as f64,
        frequency: ChannelStats::compute(&frequency, &elapsed),
        temperature: ChannelStats::compute(&temperature, &elapsed),
        voltage: ChannelStats::compute(&voltage, &elapsed),
        current: ChannelStats::compute(&current, &elapsed),
        allan_deviation,
        allan_deviations,
        status_distribution,
        primary_status,
    })
}

/// Label with the highest count; on a tie the label first in map order wins
fn primary_status(distribution: &BTreeMap<String, usize>) -> String {
    let mut best: Option<(&String, usize)> = None;
    for (label, &count) in distribution {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label.clone())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// Analysis of one log file together with its ingestion diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct LogAnalysis {
    pub source: PathBuf,
    pub result: AnalysisResult,
    pub unparsed: Vec<UnparsedLine>,
    pub total_lines: usize,
}

/// Ingest and analyze a holdover log file
pub fn analyze_log<P: AsRef<Path>>(
    path: P,
    config: &AnalysisConfig,
) -> Result<LogAnalysis, HoldoverError> {
    let path = path.as_ref();
    let report = LogIngestor::new(config.frequency_unit).parse_file(path)?;
    let unparsed = report.unparsed.clone();
    let total_lines = report.total_lines;
    let records = report.into_records()?;

    let result = analyze(&records, &config.tau_values)?;
    info!(
        "Analyzed {}: {} measurements, {} unparsed lines",
        path.display(),
        result.measurement_count,
        unparsed.len()
    );

    Ok(LogAnalysis {
        source: path.to_path_buf(),
        result,
        unparsed,
        total_lines,
    })
}

/// Analyze several logs independently
///
/// A failing log does not prevent the others from being analyzed; each
/// entry carries its own outcome.
pub fn analyze_logs<P: AsRef<Path>>(
    paths: &[P],
    config: &AnalysisConfig,
) -> Vec<(PathBuf, Result<LogAnalysis, HoldoverError>)> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let outcome = analyze_log(path, config);
            if let Err(e) = &outcome {
                error!("Failed to analyze {}: {}", path.display(), e);
            }
            (path.to_path_buf(), outcome)
        })
        .collect()
}

/// Comparison of a result against the configured stability thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub frequency_stable: bool,
    pub temperature_stable: bool,
}

impl Assessment {
    pub fn passed(&self) -> bool {
        self.frequency_stable && self.temperature_stable
    }
}

/// Check frequency and temperature stability against `config` thresholds
pub fn assess(result: &AnalysisResult, config: &AnalysisConfig) -> Assessment {
    Assessment {
        frequency_stable: result.freq_stability() <= config.frequency_stability_threshold,
        temperature_stable: result.temp_stability() <= config.temperature_stability_threshold,
    }
}
