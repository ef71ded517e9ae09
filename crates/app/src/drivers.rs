//! Driver registry — looks up the control strategy for a device.

use std::collections::HashMap;
use std::sync::Arc;

use localgw_domain::device::DriverKey;

use crate::ports::DeviceDriver;

/// Registered drivers keyed by uppercase `(vendor, class)`.
#[derive(Default, Clone)]
pub struct DriverRegistry {
    drivers: HashMap<DriverKey, Arc<dyn DeviceDriver>>,
}

impl DriverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `driver` under its own key, replacing any previous driver
    /// for the same pair.
    pub fn register(&mut self, driver: Arc<dyn DeviceDriver>) -> &mut Self {
        let key = driver.key();
        if self.drivers.insert(key.clone(), driver).is_some() {
            tracing::warn!(driver = %key, "replacing previously registered driver");
        }
        self
    }

    /// Find the driver for `vendor`/`class`, compared case-insensitively.
    #[must_use]
    pub fn lookup(&self, vendor: &str, class: &str) -> Option<Arc<dyn DeviceDriver>> {
        self.get(&DriverKey::new(vendor, class))
    }

    #[must_use]
    pub fn get(&self, key: &DriverKey) -> Option<Arc<dyn DeviceDriver>> {
        self.drivers.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &DriverKey) -> bool {
        self.drivers.contains_key(key)
    }

    /// Registered keys, sorted for stable output.
    #[must_use]
    pub fn keys(&self) -> Vec<DriverKey> {
        let mut keys: Vec<DriverKey> = self.drivers.keys().cloned().collect();
        keys.sort_by(|a, b| (a.vendor(), a.class()).cmp(&(b.vendor(), b.class())));
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.keys())
            .finish()
    }
}
