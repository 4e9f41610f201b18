// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rubidium frequency reference monitor library
//!
//! This library ingests holdover logs written by rubidium reference
//! modules, computes their stability figures (drift, Allan deviation,
//! status distribution) and renders text reports. It also drives live
//! holdover tests and monitoring through the [`device::RubidiumDevice`]
//! trait.

pub mod alerts;
pub mod analysis;
pub mod config;
pub mod device;
pub mod error;
pub mod holdover;
pub mod log_parser;
pub mod measurement;

pub use analysis::{analyze, analyze_log, AnalysisResult};
pub use error::HoldoverError;
pub use measurement::{FrequencyUnit, Measurement};
