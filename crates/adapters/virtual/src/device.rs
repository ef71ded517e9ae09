//! One simulated device: expected credentials, reachability and data points.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A simulated Tuya-like device holding boolean data points.
#[derive(Debug, Default)]
pub struct VirtualDevice {
    local_key: Option<String>,
    state: Mutex<DeviceState>,
}

#[derive(Debug, Default)]
struct DeviceState {
    online: bool,
    data_points: HashMap<String, bool>,
}

impl VirtualDevice {
    /// A reachable device accepting any local key.
    #[must_use]
    pub fn open() -> Self {
        Self::with_key(None)
    }

    /// A reachable device that only accepts `local_key`.
    #[must_use]
    pub fn keyed(local_key: impl Into<String>) -> Self {
        Self::with_key(Some(local_key.into()))
    }

    fn with_key(local_key: Option<String>) -> Self {
        Self {
            local_key,
            state: Mutex::new(DeviceState {
                online: true,
                data_points: HashMap::new(),
            }),
        }
    }

    #[must_use]
    pub fn accepts(&self, local_key: &str) -> bool {
        self.local_key.as_deref().is_none_or(|key| key == local_key)
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.lock_state().online
    }

    pub fn set_online(&self, online: bool) {
        self.lock_state().online = online;
    }

    /// Current value of data point `key`, if it was ever written.
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<bool> {
        self.lock_state().data_points.get(key).copied()
    }

    pub(crate) fn write(&self, key: &str, value: bool) {
        self.lock_state().data_points.insert(key.to_string(), value);
    }

    fn lock_state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
