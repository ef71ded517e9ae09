//! Device monitor — flags device records the dispatcher could not act on.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use localgw_domain::device::{DeviceRecord, decode_record};
use localgw_domain::error::GatewayError;

use crate::drivers::DriverRegistry;
use crate::ports::{Filter, Record, RegistryClient, Table};
use crate::timeout::bounded;
use crate::workers::BackgroundWorker;

/// Why a device record cannot be dispatched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceProblem {
    /// The row does not decode into a device record.
    Malformed(String),
    /// The protocol version is not a usable number.
    InvalidVersion(String),
    /// No driver is registered for the vendor/class pair.
    NoDriver { vendor_id: String, class_id: String },
}

impl fmt::Display for DeviceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(reason) => write!(f, "malformed record: {reason}"),
            Self::InvalidVersion(version) => write!(f, "invalid protocol version {version:?}"),
            Self::NoDriver {
                vendor_id,
                class_id,
            } => write!(f, "no driver for {vendor_id}/{class_id}"),
        }
    }
}

/// Summary of the latest monitor pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorReport {
    pub total: usize,
    pub dispatchable: usize,
    /// Problems keyed by device id, or `"<row N>"` for a row without one.
    pub problems: HashMap<String, DeviceProblem>,
}

/// Periodically checks every device record against the driver registry.
///
/// A problem is logged once when it appears and once when it clears.
pub struct DeviceMonitor {
    drivers: DriverRegistry,
    timeout: Duration,
    report: MonitorReport,
}

impl DeviceMonitor {
    #[must_use]
    pub fn new(drivers: DriverRegistry, timeout: Duration) -> Self {
        Self {
            drivers,
            timeout,
            report: MonitorReport::default(),
        }
    }

    /// Result of the most recent successful pass.
    #[must_use]
    pub fn report(&self) -> &MonitorReport {
        &self.report
    }

    fn inspect(&self, index: usize, record: Record) -> (String, Option<DeviceProblem>) {
        let id = record
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| format!("<row {index}>"), str::to_string);

        let device: DeviceRecord = match decode_record(Table::Device.as_str(), record) {
            Ok(device) => device,
            Err(err) => return (id, Some(DeviceProblem::Malformed(err.to_string()))),
        };

        if !self.drivers.contains(&device.driver_key()) {
            return (
                device.id,
                Some(DeviceProblem::NoDriver {
                    vendor_id: device.vendor_id,
                    class_id: device.class_id,
                }),
            );
        }
        if device.protocol_version().is_err() {
            return (device.id, Some(DeviceProblem::InvalidVersion(device.version)));
        }
        (device.id, None)
    }
}

impl BackgroundWorker for DeviceMonitor {
    fn name(&self) -> &'static str {
        "device-monitor"
    }

    async fn run_once<C: RegistryClient>(&mut self, client: &C) -> Result<(), GatewayError> {
        let rows = bounded(
            "registry read",
            self.timeout,
            client.read_multiple(Table::Device, &Filter::new()),
        )
        .await?
        .unwrap_or_default();

        let mut report = MonitorReport {
            total: rows.len(),
            ..MonitorReport::default()
        };
        for (index, row) in rows.into_iter().enumerate() {
            match self.inspect(index, row) {
                (_, None) => report.dispatchable += 1,
                (device_id, Some(problem)) => {
                    if self.report.problems.get(&device_id) != Some(&problem) {
                        tracing::warn!(%device_id, %problem, "device cannot receive commands");
                    }
                    report.problems.insert(device_id, problem);
                }
            }
        }
        for device_id in self.report.problems.keys() {
            if !report.problems.contains_key(device_id) {
                tracing::info!(%device_id, "device problem cleared");
            }
        }

        tracing::debug!(
            total = report.total,
            dispatchable = report.dispatchable,
            problems = report.problems.len(),
            "device monitor pass complete"
        );
        self.report = report;
        Ok(())
    }
}
