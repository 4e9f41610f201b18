// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Holdover test runs
//!
//! A holdover test puts the reference module into holdover, samples every
//! parameter at a fixed interval for the requested duration, then analyzes
//! the collected records. Every sample is also appended to a log file in the
//! canonical comma-separated layout, so a run can be re-analyzed later with
//! [`crate::analysis::analyze_log`].
//!
//! Files written for an output path `results/run.json`:
//! - `results/run.log`: raw samples
//! - `results/run.json`: run parameters, samples and analysis result
//! - `results/run_summary.txt`: text report

pub mod monitor;

pub use monitor::Monitor;

use crate::alerts::check_measurement;
use crate::analysis::{analyze, assess, report::generate_report, AnalysisResult, Assessment};
use crate::config::{AlertsConfig, AnalysisConfig, Config, HoldoverConfig};
use crate::device::RubidiumDevice;
use crate::error::HoldoverError;
use crate::measurement::Measurement;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// Parameters of one holdover run
#[derive(Debug, Clone)]
pub struct HoldoverPlan {
    pub duration: Duration,
    pub interval: Duration,
    /// Path of the JSON result file
    pub output: PathBuf,
}

impl HoldoverPlan {
    /// Check the plan against the configured limits
    pub fn validate(&self, limits: &HoldoverConfig) -> Result<(), HoldoverError> {
        if self.interval.is_zero() {
            return Err(HoldoverError::InvalidPlan(
                "interval must be greater than zero".to_string(),
            ));
        }

        let duration = self.duration.as_secs_f64();
        let interval = self.interval.as_secs_f64();
        if duration < limits.min_duration_s as f64 {
            return Err(HoldoverError::InvalidPlan(format!(
                "duration must be at least {} seconds",
                limits.min_duration_s
            )));
        }
        if duration > limits.max_duration_s as f64 {
            return Err(HoldoverError::InvalidPlan(format!(
                "duration must be at most {} seconds",
                limits.max_duration_s
            )));
        }
        if interval < limits.min_interval_s as f64 {
            return Err(HoldoverError::InvalidPlan(format!(
                "interval must be at least {} seconds",
                limits.min_interval_s
            )));
        }
        if interval > limits.max_interval_s as f64 {
            return Err(HoldoverError::InvalidPlan(format!(
                "interval must be at most {} seconds",
                limits.max_interval_s
            )));
        }
        Ok(())
    }

    /// Number of samples taken, one per started interval
    pub fn sample_count(&self) -> usize {
        (self.duration.as_secs_f64() / self.interval.as_secs_f64()).ceil() as usize
    }

    pub fn log_path(&self) -> PathBuf {
        self.output.with_extension("log")
    }

    pub fn summary_path(&self) -> PathBuf {
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "holdover".to_string());
        self.output.with_file_name(format!("{}_summary.txt", stem))
    }
}

/// Content of the JSON result file
#[derive(Debug, Serialize)]
struct HoldoverRecord<'a> {
    start_time: DateTime<Local>,
    duration_s: f64,
    interval_s: f64,
    log_file: &'a Path,
    measurements: &'a [Measurement],
    results: &'a AnalysisResult,
    assessment: Assessment,
}

/// Outcome of a completed holdover run
#[derive(Debug, Clone)]
pub struct HoldoverOutcome {
    pub result: AnalysisResult,
    pub assessment: Assessment,
    pub measurements: Vec<Measurement>,
    /// Number of samples that raised at least one alert
    pub alerted_samples: usize,
    pub log_path: PathBuf,
    pub json_path: PathBuf,
    pub summary_path: PathBuf,
}

/// Runs holdover tests on a device
pub struct HoldoverTest<D: RubidiumDevice> {
    device: D,
    limits: HoldoverConfig,
    analysis: AnalysisConfig,
    alerts: AlertsConfig,
}

impl<D: RubidiumDevice> HoldoverTest<D> {
    pub fn new(device: D, config: &Config) -> Self {
        Self {
            device,
            limits: config.holdover.clone(),
            analysis: config.analysis.clone(),
            alerts: config.alerts.clone(),
        }
    }

    /// Give the device back
    pub fn into_device(self) -> D {
        self.device
    }

    /// Execute `plan`
    ///
    /// Holdover is left on the device in every case once it was entered,
    /// including when a read fails mid-run.
    pub async fn run(&mut self, plan: &HoldoverPlan) -> Result<HoldoverOutcome> {
        plan.validate(&self.limits)?;
        info!(
            "Starting holdover test: duration={:?}, interval={:?}",
            plan.duration, plan.interval
        );

        if let Some(parent) = plan.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create output directory {:?}", parent))?;
            }
        }

        let start_time = Local::now();
        let log_path = plan.log_path();
        let mut log = BufWriter::new(
            File::create(&log_path)
                .with_context(|| format!("Failed to create log file {:?}", log_path))?,
        );
        writeln!(log, "# holdover test started {}", start_time.to_rfc3339())?;
        writeln!(
            log,
            "# elapsed_s,frequency_error,temperature_c,voltage_v,current_a,status"
        )?;

        self.device
            .start_holdover()
            .await
            .context("Failed to start holdover mode")?;
        info!("Holdover mode started");

        let acquisition = self.acquire(plan, &mut log).await;
        let stopped = self.device.stop_holdover().await;

        let (measurements, alerted_samples) = match acquisition {
            Ok(collected) => collected,
            Err(e) => {
                error!("Holdover test failed: {:#}", e);
                if let Err(stop_err) = stopped {
                    error!("Failed to stop holdover mode: {:#}", stop_err);
                }
                return Err(e);
            }
        };
        stopped.context("Failed to stop holdover mode")?;
        info!("Holdover mode stopped");

        log.flush()
            .with_context(|| format!("Failed to write log file {:?}", log_path))?;

        let result = analyze(&measurements, &self.analysis.tau_values)?;
        let assessment = assess(&result, &self.analysis);

        let record = HoldoverRecord {
            start_time,
            duration_s: plan.duration.as_secs_f64(),
            interval_s: plan.interval.as_secs_f64(),
            log_file: &log_path,
            measurements: &measurements,
            results: &result,
            assessment,
        };
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&plan.output, json)
            .with_context(|| format!("Failed to write results to {:?}", plan.output))?;

        let summary_path = plan.summary_path();
        generate_report(&result, Some(&summary_path))?;
        info!(
            "Results saved to {} and {}",
            plan.output.display(),
            summary_path.display()
        );

        Ok(HoldoverOutcome {
            result,
            assessment,
            measurements,
            alerted_samples,
            log_path,
            json_path: plan.output.clone(),
            summary_path,
        })
    }

    async fn acquire<W: Write>(
        &mut self,
        plan: &HoldoverPlan,
        log: &mut W,
    ) -> Result<(Vec<Measurement>, usize)> {
        let count = plan.sample_count();
        let mut measurements = Vec::with_capacity(count);
        let mut alerted_samples = 0;

        let mut ticker = interval(plan.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let start = Instant::now();

        for n in 0..count {
            ticker.tick().await;
            let elapsed = start.elapsed().as_secs_f64();
            let measurement = self
                .device
                .read_measurement(elapsed)
                .await
                .with_context(|| format!("Failed to read measurement {}", n + 1))?;

            let alerts = check_measurement(&measurement, &self.alerts);
            if !alerts.is_empty() {
                alerted_samples += 1;
                for alert in &alerts {
                    warn!("Measurement {}: {}", n + 1, alert);
                }
            }

            debug!(
                "Measurement {}: freq_error={:.2e}, temp={:.2}°C, status={}",
                n + 1,
                measurement.frequency_error,
                measurement.temperature,
                measurement.status
            );
            writeln!(log, "{}", measurement.to_log_line())?;
            measurements.push(measurement);
        }

        Ok((measurements, alerted_samples))
    }
}
