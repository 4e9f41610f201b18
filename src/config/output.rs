// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Result file locations

use anyhow::{anyhow, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Where holdover results are written when no explicit path is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving result files. Default is `results`.
    pub directory: String,
    /// `chrono` format string used to name result files.
    pub timestamp_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "results".to_string(),
            timestamp_format: "%Y%m%d_%H%M%S".to_string(),
        }
    }
}

impl OutputConfig {
    /// Check that `timestamp_format` only holds valid `chrono` specifiers
    pub fn check_timestamp_format(&self) -> Result<()> {
        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(anyhow!(
                "output.timestamp_format '{}' is not a valid strftime format",
                self.timestamp_format
            ));
        }
        Ok(())
    }

    /// Default result path for a run started at `start`
    pub fn result_path(&self, start: chrono::DateTime<chrono::Local>) -> Result<PathBuf> {
        self.check_timestamp_format()?;
        let mut name = String::from("holdover_");
        write!(name, "{}", start.format(&self.timestamp_format)).map_err(|_| {
            anyhow!(
                "Failed to format run start with '{}'",
                self.timestamp_format
            )
        })?;
        name.push_str(".json");
        Ok(PathBuf::from(&self.directory).join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_result_path_uses_format() {
        let start = chrono::Local.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap();
        let path = OutputConfig::default().result_path(start).unwrap();
        assert_eq!(path, PathBuf::from("results/holdover_20250314_150926.json"));
    }

    #[test]
    fn test_unknown_specifier_is_an_error() {
        let config = OutputConfig {
            timestamp_format: "%Q".to_string(),
            ..Default::default()
        };
        assert!(config.check_timestamp_format().is_err());
        assert!(config.result_path(chrono::Local::now()).is_err());
    }
}
