// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Simulated rubidium reference module
//!
//! While locked the simulated module reports its configured offset plus
//! noise. Once in holdover the frequency error drifts linearly with the
//! time spent in holdover. Temperature, voltage and current vary around
//! their nominal values.

use super::{DeviceStatus, RubidiumDevice};
use crate::config::SimulationConfig;
use anyhow::{anyhow, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

pub struct SimulatedDevice {
    config: SimulationConfig,
    rng: StdRng,
    /// Start of the current holdover, `None` while disciplined
    holdover_since: Option<Instant>,
    /// Number of parameter reads served so far
    reads: usize,
    /// Reads after which every call fails
    fail_after: Option<usize>,
}

impl SimulatedDevice {
    /// Create a simulated device, seeded from `config.seed` when set
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!("Initializing simulated rubidium module (seed: {:?})", config.seed);
        Self {
            config,
            rng,
            holdover_since: None,
            reads: 0,
            fail_after: None,
        }
    }

    /// Make every parameter read fail once `reads` reads have been served
    pub fn with_failure_after(mut self, reads: usize) -> Self {
        self.fail_after = Some(reads);
        self
    }

    pub fn in_holdover(&self) -> bool {
        self.holdover_since.is_some()
    }

    fn next_read(&mut self) -> Result<()> {
        if self.fail_after.is_some_and(|limit| self.reads >= limit) {
            return Err(anyhow!("simulated communication failure"));
        }
        self.reads += 1;
        Ok(())
    }

    /// Uniform noise in `[-amplitude, amplitude]`
    fn noise(&mut self, amplitude: f64) -> f64 {
        if amplitude > 0.0 && amplitude.is_finite() {
            self.rng.random_range(-1.0_f64..=1.0) * amplitude
        } else {
            0.0
        }
    }
}

#[async_trait::async_trait]
impl RubidiumDevice for SimulatedDevice {
    async fn status(&mut self) -> Result<DeviceStatus> {
        self.next_read()?;
        Ok(if self.in_holdover() {
            DeviceStatus::Holdover
        } else {
            DeviceStatus::Locked
        })
    }

    async fn frequency_error(&mut self) -> Result<f64> {
        self.next_read()?;
        let drift = self
            .holdover_since
            .map(|since| since.elapsed().as_secs_f64() * self.config.drift_per_second)
            .unwrap_or(0.0);
        let noise = self.noise(self.config.frequency_noise);
        Ok(self.config.frequency_offset + drift + noise)
    }

    async fn temperature(&mut self) -> Result<f64> {
        self.next_read()?;
        let noise = self.noise(self.config.temperature_noise);
        Ok(self.config.nominal_temperature + noise)
    }

    async fn voltage(&mut self) -> Result<f64> {
        self.next_read()?;
        let noise = self.noise(0.01);
        Ok(self.config.nominal_voltage + noise)
    }

    async fn current(&mut self) -> Result<f64> {
        self.next_read()?;
        let noise = self.noise(0.002);
        Ok(self.config.nominal_current + noise)
    }

    async fn start_holdover(&mut self) -> Result<()> {
        debug!("Simulated module entering holdover");
        self.holdover_since = Some(Instant::now());
        Ok(())
    }

    async fn stop_holdover(&mut self) -> Result<()> {
        debug!("Simulated module leaving holdover");
        self.holdover_since = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            frequency_noise: 0.0,
            temperature_noise: 0.0,
            seed: Some(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_status_follows_holdover() {
        let mut device = SimulatedDevice::new(quiet_config());
        assert_eq!(device.status().await.unwrap(), DeviceStatus::Locked);
        device.start_holdover().await.unwrap();
        assert_eq!(device.status().await.unwrap(), DeviceStatus::Holdover);
        device.stop_holdover().await.unwrap();
        assert_eq!(device.status().await.unwrap(), DeviceStatus::Locked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_frequency_drifts_in_holdover() {
        let config = SimulationConfig {
            drift_per_second: 1e-12,
            ..quiet_config()
        };
        let offset = config.frequency_offset;
        let mut device = SimulatedDevice::new(config);

        assert_eq!(device.frequency_error().await.unwrap(), offset);
        device.start_holdover().await.unwrap();
        tokio::time::advance(Duration::from_secs(100)).await;
        let drifted = device.frequency_error().await.unwrap();
        approx::assert_relative_eq!(drifted, offset + 1e-10, max_relative = 1e-6);
    }

    #[tokio::test]
    async fn test_seeded_devices_agree() {
        let config = SimulationConfig {
            seed: Some(99),
            ..Default::default()
        };
        let mut a = SimulatedDevice::new(config.clone());
        let mut b = SimulatedDevice::new(config);
        let ma = a.read_measurement(0.0).await.unwrap();
        let mb = b.read_measurement(0.0).await.unwrap();
        assert_eq!(ma, mb);
        assert_eq!(ma.status, "LOCKED");
    }

    #[tokio::test]
    async fn test_huge_noise_amplitude() {
        let config = SimulationConfig {
            frequency_noise: f64::MAX,
            seed: Some(5),
            ..Default::default()
        };
        let mut device = SimulatedDevice::new(config);
        assert!(device.frequency_error().await.unwrap().is_finite());
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mut device = SimulatedDevice::new(quiet_config()).with_failure_after(2);
        assert!(device.temperature().await.is_ok());
        assert!(device.voltage().await.is_ok());
        assert!(device.current().await.is_err());
    }
}
