// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Single line parser for holdover logs

use crate::measurement::Measurement;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Supported line layouts, tried in order. The first match wins.
///
/// Every pattern captures six groups: timestamp, frequency error,
/// temperature, voltage, current and status.
static LINE_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    const TS: &str = r"(\d+\.?\d*)";
    const FREQ: &str = r"([+-]?\d+\.?\d*(?:[eE][+-]?\d+)?)";
    const NUM: &str = r"([+-]?\d+\.?\d*)";
    const STATUS: &str = r"(\w+)";

    let build = |pattern: String| Regex::new(&pattern).expect("static log pattern is valid");
    [
        // TS,FREQ,TEMP,VOLT,CURR,STATUS
        build(format!("^{TS},{FREQ},{NUM},{NUM},{NUM},{STATUS}$")),
        // TS FREQ TEMP VOLT CURR STATUS
        build(format!(r"^{TS}\s+{FREQ}\s+{NUM}\s+{NUM}\s+{NUM}\s+{STATUS}$")),
        // [TS] FREQ TEMP VOLT CURR STATUS
        build(format!(r"^\[{TS}\]\s+{FREQ}\s+{NUM}\s+{NUM}\s+{NUM}\s+{STATUS}$")),
        // TS: FREQ, TEMP, VOLT, CURR, STATUS
        build(format!(r"^{TS}:\s*{FREQ},\s*{NUM},\s*{NUM},\s*{NUM},\s*{STATUS}$")),
    ]
});

/// Parse one log line into a [`Measurement`]
///
/// The line must already be stripped of surrounding whitespace; comment
/// and blank lines are filtered by the caller. Returns `None` when no
/// layout matches or a numeric field does not convert to a finite value.
/// The frequency error is returned as written, without unit conversion.
pub fn parse_line(line: &str) -> Option<Measurement> {
    LINE_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(line))
        .find_map(|caps| measurement_from_captures(&caps))
}

fn measurement_from_captures(caps: &Captures<'_>) -> Option<Measurement> {
    let number = |index: usize| -> Option<f64> {
        caps.get(index)?
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    };

    Some(Measurement {
        timestamp: number(1)?,
        frequency_error: number(2)?,
        temperature: number(3)?,
        voltage: number(4)?,
        current: number(5)?,
        status: caps.get(6)?.as_str().to_string(),
    })
}
