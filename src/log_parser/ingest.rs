// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Log ingestion
//!
//! Reads a holdover log line by line, keeps every record that parses and
//! reports the others as diagnostics. A bad line never aborts ingestion.

use super::line::parse_line;
use crate::error::HoldoverError;
use crate::measurement::{FrequencyUnit, Measurement};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A line that matched none of the supported layouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnparsedLine {
    /// 1-based line number in the source
    pub line_number: usize,
    /// Line content with surrounding whitespace removed
    pub text: String,
}

/// Outcome of ingesting one log source
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Parsed records, in source order
    pub records: Vec<Measurement>,
    /// Lines that could not be parsed
    pub unparsed: Vec<UnparsedLine>,
    /// Number of lines read, including blank and comment lines
    pub total_lines: usize,
    /// Number of blank and comment lines
    pub skipped_lines: usize,
}

impl IngestReport {
    /// Take the records, failing when none were parsed
    pub fn into_records(self) -> Result<Vec<Measurement>, HoldoverError> {
        if self.records.is_empty() {
            return Err(HoldoverError::NoValidMeasurements {
                unparsed: self.unparsed.len(),
            });
        }
        Ok(self.records)
    }

    /// Line numbers of the unparsed lines
    pub fn unparsed_line_numbers(&self) -> Vec<usize> {
        self.unparsed.iter().map(|u| u.line_number).collect()
    }
}

/// Reads holdover logs into measurement records
#[derive(Debug, Clone, Copy, Default)]
pub struct LogIngestor {
    frequency_unit: FrequencyUnit,
}

impl LogIngestor {
    /// Create an ingestor converting the frequency column from `frequency_unit`
    pub fn new(frequency_unit: FrequencyUnit) -> Self {
        Self { frequency_unit }
    }

    /// Ingest the log file at `path`
    ///
    /// Fails with [`HoldoverError::SourceNotFound`] when the file cannot be
    /// opened. Unparsable lines are reported in the returned
    /// [`IngestReport`].
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<IngestReport, HoldoverError> {
        let path = path.as_ref();
        info!("Parsing holdover log: {}", path.display());

        let file = File::open(path).map_err(|source| HoldoverError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        self.parse_source(BufReader::new(file), path.to_path_buf())
    }

    /// Ingest from any buffered reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<IngestReport, HoldoverError> {
        self.parse_source(reader, PathBuf::from("<stream>"))
    }

    fn parse_source<R: BufRead>(
        &self,
        reader: R,
        origin: PathBuf,
    ) -> Result<IngestReport, HoldoverError> {
        let mut report = IngestReport::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| HoldoverError::Read {
                path: origin.clone(),
                source,
            })?;
            let line_number = index + 1;
            report.total_lines += 1;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                report.skipped_lines += 1;
                continue;
            }

            match parse_line(line) {
                Some(mut measurement) => {
                    measurement.frequency_error =
                        self.frequency_unit.to_fractional(measurement.frequency_error);
                    report.records.push(measurement);
                }
                None => {
                    warn!("Could not parse line {}: {}", line_number, line);
                    report.unparsed.push(UnparsedLine {
                        line_number,
                        text: line.to_string(),
                    });
                }
            }
        }

        debug!(
            "Ingested {}: {} records, {} unparsed, {} skipped of {} lines",
            origin.display(),
            report.records.len(),
            report.unparsed.len(),
            report.skipped_lines,
            report.total_lines
        );

        Ok(report)
    }
}
