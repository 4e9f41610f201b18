// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rubidium-monitor project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Live parameter monitoring

use crate::alerts::{check_measurement, Alert};
use crate::config::AlertsConfig;
use crate::device::RubidiumDevice;
use crate::measurement::Measurement;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};

/// Polls a device at a fixed interval and checks every sample for alerts
pub struct Monitor<D: RubidiumDevice> {
    device: D,
    alerts: AlertsConfig,
    interval: Duration,
}

impl<D: RubidiumDevice> Monitor<D> {
    pub fn new(device: D, alerts: AlertsConfig, interval: Duration) -> Self {
        Self {
            device,
            alerts,
            interval,
        }
    }

    /// Poll the device `count` times, or until the future is dropped when
    /// `count` is `None`
    ///
    /// `on_sample` receives every sample with the alerts it raised. Returns
    /// the number of samples taken.
    pub async fn run<F>(&mut self, count: Option<usize>, mut on_sample: F) -> Result<usize>
    where
        F: FnMut(&Measurement, &[Alert]) + Send,
    {
        info!("Starting monitoring with {:?} interval", self.interval);
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let start = Instant::now();
        let mut taken = 0;

        while count.map_or(true, |limit| taken < limit) {
            ticker.tick().await;
            let elapsed = start.elapsed().as_secs_f64();
            let measurement = self
                .device
                .read_measurement(elapsed)
                .await
                .context("Failed to read device parameters")?;

            let alerts = check_measurement(&measurement, &self.alerts);
            for alert in &alerts {
                warn!("{}", alert);
            }
            debug!("Sample {}: {}", taken + 1, measurement.to_log_line());
            on_sample(&measurement, &alerts);
            taken += 1;
        }

        info!("Monitoring stopped after {} samples", taken);
        Ok(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::device::SimulatedDevice;

    #[tokio::test(start_paused = true)]
    async fn test_monitor_takes_requested_samples() {
        let device = SimulatedDevice::new(SimulationConfig {
            seed: Some(3),
            ..Default::default()
        });
        let mut monitor = Monitor::new(device, AlertsConfig::default(), Duration::from_secs(10));

        let mut timestamps = Vec::new();
        let taken = monitor
            .run(Some(3), |m, alerts| {
                assert!(alerts.is_empty());
                timestamps.push(m.timestamp);
            })
            .await
            .unwrap();

        assert_eq!(taken, 3);
        assert_eq!(timestamps.len(), 3);
        assert_eq!(timestamps[0], 0.0);
        assert!(timestamps[2] >= 20.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_reports_alerts() {
        let device = SimulatedDevice::new(SimulationConfig {
            nominal_temperature: 60.0,
            seed: Some(3),
            ..Default::default()
        });
        let mut monitor = Monitor::new(device, AlertsConfig::default(), Duration::from_secs(1));

        let mut raised = 0;
        monitor
            .run(Some(2), |_, alerts| raised += alerts.len())
            .await
            .unwrap();
        assert_eq!(raised, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_monitor_stops_on_read_failure() {
        let device = SimulatedDevice::new(SimulationConfig::default()).with_failure_after(5);
        let mut monitor = Monitor::new(device, AlertsConfig::default(), Duration::from_secs(1));
        assert!(monitor.run(Some(4), |_, _| {}).await.is_err());
    }
}
