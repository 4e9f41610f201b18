// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Holdover log parsing
//!
//! This module turns text logs written by holdover test rigs into ordered
//! [`Measurement`](crate::measurement::Measurement) records. Four line
//! layouts are understood:
//!
//! ```text
//! 1000.0,1.0e-9,25.0,12.0,0.5,LOCKED
//! 1000.0 1.0e-9 25.0 12.0 0.5 LOCKED
//! [1000.0] 1.0e-9 25.0 12.0 0.5 LOCKED
//! 1000.0: 1.0e-9, 25.0, 12.0, 0.5, LOCKED
//! ```

pub mod ingest;
pub mod line;

pub use ingest::{IngestReport, LogIngestor, UnparsedLine};
pub use line::parse_line;
