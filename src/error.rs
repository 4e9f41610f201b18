// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Error types for log ingestion, analysis and holdover runs
//!
//! Lines that fail to parse are not errors: they are collected as
//! [`crate::log_parser::UnparsedLine`] diagnostics and ingestion continues.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum HoldoverError {
    #[error("Log source not found or unreadable: {}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read log source {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No valid measurements found ({unparsed} unparsable lines)")]
    NoValidMeasurements { unparsed: usize },
    #[error("Insufficient measurements for analysis: {found} found, at least 2 required")]
    InsufficientData { found: usize },
    #[error("Failed to write report to {}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid holdover plan: {0}")]
    InvalidPlan(String),
}
