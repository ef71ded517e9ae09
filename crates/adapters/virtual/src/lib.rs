//! # localgw-adapter-virtual
//!
//! Simulated device connector. Stands in for the LAN protocol so the gateway
//! can run end to end without physical hardware.
//!
//! ## Behaviour
//!
//! | Situation | Result |
//! |-----------|--------|
//! | Device registered with a local key | Sessions with another key fail |
//! | Device marked offline | Sessions fail as unreachable |
//! | Unknown device, permissive connector | Device is created on first contact |
//! | Unknown device, strict connector | Sessions fail as unknown |
//!
//! The latest value per data point is kept. Writes are also appended to a
//! log holding the most recent [`WRITE_LOG_CAPACITY`] entries.
//!
//! ## Dependency rule
//!
//! Depends on `localgw-app` (port traits) and `localgw-domain` only.

mod device;
mod error;

pub use device::VirtualDevice;
pub use error::VirtualDeviceError;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use localgw_app::ports::{DeviceConnector, DeviceKind, DeviceSession, SessionParams};
use localgw_domain::device::ProtocolVersion;
use localgw_domain::error::GatewayError;

/// One data point write observed by a virtual device.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    pub device_id: String,
    pub kind: DeviceKind,
    pub version: ProtocolVersion,
    pub key: String,
    pub value: bool,
}

/// Default number of writes kept in the log; older ones are dropped.
pub const WRITE_LOG_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct Shared {
    devices: Mutex<HashMap<String, Arc<VirtualDevice>>>,
    writes: Mutex<VecDeque<WriteRecord>>,
}

/// [`DeviceConnector`] backed by in-memory devices.
///
/// Cheap to clone; clones share the same devices and write log.
#[derive(Debug, Clone)]
pub struct VirtualConnector {
    shared: Arc<Shared>,
    strict: bool,
    write_capacity: usize,
}

impl Default for VirtualConnector {
    fn default() -> Self {
        Self {
            shared: Arc::default(),
            strict: false,
            write_capacity: WRITE_LOG_CAPACITY,
        }
    }
}

impl VirtualConnector {
    /// A connector that creates unknown devices on first contact.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A connector that only talks to registered devices.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Keep at most `capacity` writes in the log. Zero disables it.
    #[must_use]
    pub fn with_write_capacity(mut self, capacity: usize) -> Self {
        self.write_capacity = capacity;
        self
    }

    /// Register a device that only accepts `local_key`.
    pub fn register_device(&self, device_id: impl Into<String>, local_key: impl Into<String>) {
        self.insert(device_id.into(), VirtualDevice::keyed(local_key));
    }

    /// Register a device that accepts any local key.
    pub fn register_open_device(&self, device_id: impl Into<String>) {
        self.insert(device_id.into(), VirtualDevice::open());
    }

    #[must_use]
    pub fn device(&self, device_id: &str) -> Option<Arc<VirtualDevice>> {
        self.lock_devices().get(device_id).cloned()
    }

    /// Mark a registered device reachable or unreachable.
    ///
    /// Returns `false` when the device is unknown.
    pub fn set_online(&self, device_id: &str, online: bool) -> bool {
        let Some(device) = self.device(device_id) else {
            return false;
        };
        device.set_online(online);
        true
    }

    /// Latest value written to data point `key` of `device_id`.
    #[must_use]
    pub fn value_of(&self, device_id: &str, key: &str) -> Option<bool> {
        self.device(device_id)?.value_of(key)
    }

    /// Most recent writes, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock_writes().iter().cloned().collect()
    }

    fn record(&self, write: WriteRecord) {
        if self.write_capacity == 0 {
            return;
        }
        let mut writes = self.lock_writes();
        while writes.len() >= self.write_capacity {
            writes.pop_front();
        }
        writes.push_back(write);
    }

    fn insert(&self, device_id: String, device: VirtualDevice) {
        self.lock_devices().insert(device_id, Arc::new(device));
    }

    fn resolve(&self, params: &SessionParams) -> Result<Arc<VirtualDevice>, VirtualDeviceError> {
        let mut devices = self.lock_devices();
        if let Some(device) = devices.get(&params.device_id) {
            return Ok(Arc::clone(device));
        }
        if self.strict {
            return Err(VirtualDeviceError::UnknownDevice {
                device_id: params.device_id.clone(),
            });
        }
        tracing::info!(
            device_id = %params.device_id,
            "provisioning virtual device on first contact"
        );
        let device = Arc::new(VirtualDevice::open());
        devices.insert(params.device_id.clone(), Arc::clone(&device));
        Ok(device)
    }

    fn lock_devices(&self) -> MutexGuard<'_, HashMap<String, Arc<VirtualDevice>>> {
        self.shared
            .devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_writes(&self) -> MutexGuard<'_, VecDeque<WriteRecord>> {
        self.shared
            .writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceConnector for VirtualConnector {
    type Session = VirtualSession;

    async fn open(&self, params: SessionParams) -> Result<VirtualSession, GatewayError> {
        let device = self.resolve(&params)?;
        if !device.is_online() {
            return Err(VirtualDeviceError::Unreachable {
                device_id: params.device_id,
                address: params.address,
            }
            .into());
        }
        if !device.accepts(&params.local_key) {
            return Err(VirtualDeviceError::KeyMismatch {
                device_id: params.device_id,
            }
            .into());
        }

        tracing::debug!(
            device_id = %params.device_id,
            kind = %params.kind,
            version = %params.version,
            "virtual session opened"
        );
        Ok(VirtualSession {
            params,
            device,
            connector: self.clone(),
        })
    }
}

/// Session to one [`VirtualDevice`].
pub struct VirtualSession {
    params: SessionParams,
    device: Arc<VirtualDevice>,
    connector: VirtualConnector,
}

impl DeviceSession for VirtualSession {
    async fn set_value(&self, key: &str, value: bool) -> Result<(), GatewayError> {
        self.device.write(key, value);
        self.connector.record(WriteRecord {
            device_id: self.params.device_id.clone(),
            kind: self.params.kind,
            version: self.params.version,
            key: key.to_string(),
            value,
        });
        tracing::info!(device_id = %self.params.device_id, key, value, "virtual data point set");
        Ok(())
    }
}
