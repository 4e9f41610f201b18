// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Plain-text holdover analysis report

use super::AnalysisResult;
use crate::error::HoldoverError;
use log::info;
use std::fmt::Write as _;
use std::path::Path;

/// Render `result` as a human-readable report
///
/// The output depends only on `result`.
pub fn format_report(result: &AnalysisResult) -> String {
    let mut report = String::new();
    // Writing into a String cannot fail
    let _ = write_sections(&mut report, result);
    report
}

/// Render `result` and, when `output` is given, write the report there
///
/// An existing file at `output` is overwritten.
pub fn generate_report(
    result: &AnalysisResult,
    output: Option<&Path>,
) -> Result<String, HoldoverError> {
    let report = format_report(result);

    if let Some(path) = output {
        std::fs::write(path, &report).map_err(|source| HoldoverError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Report saved to {}", path.display());
    }

    Ok(report)
}

fn write_sections(out: &mut String, r: &AnalysisResult) -> std::fmt::Result {
    writeln!(out, "Holdover Test Analysis Report")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;

    writeln!(out, "Test Overview:")?;
    writeln!(out, "  Duration: {:.2} seconds", r.duration)?;
    writeln!(out, "  Measurement Count: {}", r.measurement_count)?;
    writeln!(out, "  Average Interval: {:.2} seconds", r.measurement_interval)?;
    writeln!(out)?;

    writeln!(out, "Frequency Stability Analysis:")?;
    writeln!(out, "  Stability (std): {:.2e}", r.frequency.std_dev)?;
    writeln!(out, "  Drift Rate: {:.2e}/s", r.frequency.drift_rate)?;
    writeln!(out, "  Allan Deviation (1s): {:.2e}", r.allan_deviation)?;
    writeln!(out, "  Min Error: {:.2e}", r.frequency.min)?;
    writeln!(out, "  Max Error: {:.2e}", r.frequency.max)?;
    writeln!(out, "  Mean Error: {:.2e}", r.frequency.mean)?;
    writeln!(out)?;

    writeln!(out, "Allan Deviations:")?;
    for (tau, deviation) in &r.allan_deviations {
        writeln!(out, "  τ={}s: {:.2e}", tau, deviation)?;
    }
    writeln!(out)?;

    writeln!(out, "Temperature Stability:")?;
    writeln!(out, "  Stability (std): {:.3}°C", r.temperature.std_dev)?;
    writeln!(out, "  Drift Rate: {:.3}°C/s", r.temperature.drift_rate)?;
    writeln!(out, "  Min Temp: {:.2}°C", r.temperature.min)?;
    writeln!(out, "  Max Temp: {:.2}°C", r.temperature.max)?;
    writeln!(out, "  Mean Temp: {:.2}°C", r.temperature.mean)?;
    writeln!(out)?;

    writeln!(out, "Power Analysis:")?;
    writeln!(out, "  Voltage Stability: {:.3}V", r.voltage.std_dev)?;
    writeln!(out, "  Current Stability: {:.3}A", r.current.std_dev)?;
    writeln!(
        out,
        "  Voltage Range: {:.2}V - {:.2}V",
        r.voltage.min, r.voltage.max
    )?;
    writeln!(
        out,
        "  Current Range: {:.3}A - {:.3}A",
        r.current.min, r.current.max
    )?;
    writeln!(out)?;

    writeln!(out, "Status Analysis:")?;
    writeln!(out, "  Primary Status: {}", r.primary_status)?;
    for (status, count) in &r.status_distribution {
        let percentage = *count as f64 / r.measurement_count as f64 * 100.0;
        writeln!(out, "  {}: {} ({:.1}%)", status, count, percentage)?;
    }

    Ok(())
}
