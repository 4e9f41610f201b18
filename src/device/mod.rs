// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Reference module communication
//!
//! The monitor talks to the rubidium module only through the
//! [`RubidiumDevice`] trait, so the transport (serial framing, TCP bridge,
//! ...) stays outside this crate. [`SimulatedDevice`] implements the trait
//! for development and tests.

pub mod simulated;

pub use simulated::SimulatedDevice;

use crate::measurement::Measurement;
use anyhow::Result;
use std::fmt;

/// Operating status reported by the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceStatus {
    Ok,
    Locked,
    Holdover,
    WarmingUp,
    Error,
    NotLocked,
    Unknown,
}

impl DeviceStatus {
    /// Decode the module's status byte
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => DeviceStatus::Ok,
            0x01 => DeviceStatus::Locked,
            0x02 => DeviceStatus::Holdover,
            0x03 => DeviceStatus::WarmingUp,
            0x04 => DeviceStatus::Error,
            0x05 => DeviceStatus::NotLocked,
            _ => DeviceStatus::Unknown,
        }
    }

    /// Label used in logs and status distributions
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Ok => "OK",
            DeviceStatus::Locked => "LOCKED",
            DeviceStatus::Holdover => "HOLDOVER",
            DeviceStatus::WarmingUp => "WARMING_UP",
            DeviceStatus::Error => "ERROR",
            DeviceStatus::NotLocked => "NOT_LOCKED",
            DeviceStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter readout and holdover control of a rubidium reference module
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RubidiumDevice: Send {
    /// Current operating status
    async fn status(&mut self) -> Result<DeviceStatus>;

    /// Fractional frequency error
    async fn frequency_error(&mut self) -> Result<f64>;

    /// Temperature in °C
    async fn temperature(&mut self) -> Result<f64>;

    /// Supply voltage in V
    async fn voltage(&mut self) -> Result<f64>;

    /// Supply current in A
    async fn current(&mut self) -> Result<f64>;

    /// Stop disciplining and free-run on the local oscillator
    async fn start_holdover(&mut self) -> Result<()>;

    /// Resume disciplining
    async fn stop_holdover(&mut self) -> Result<()>;

    /// Read every parameter and assemble a measurement stamped `timestamp`
    async fn read_measurement(&mut self, timestamp: f64) -> Result<Measurement> {
        let status = self.status().await?;
        Ok(Measurement {
            timestamp,
            frequency_error: self.frequency_error().await?,
            temperature: self.temperature().await?,
            voltage: self.voltage().await?,
            current: self.current().await?,
            status: status.as_str().to_string(),
        })
    }
}
