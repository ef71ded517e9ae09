//! Device link port — sessions to physical devices.
//!
//! The wire protocol to a physical device lives behind this port. A driver
//! opens one session per command, writes one attribute and drops the session.

use std::fmt;
use std::future::Future;

use localgw_domain::device::{DeviceTarget, ProtocolVersion};
use localgw_domain::error::GatewayError;

/// Device-type wrapper the session is opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Bulb,
    Outlet,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bulb => f.write_str("bulb"),
            Self::Outlet => f.write_str("outlet"),
        }
    }
}

/// Parameters for opening a device session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParams {
    pub device_id: String,
    pub address: String,
    pub local_key: String,
    pub version: ProtocolVersion,
    pub kind: DeviceKind,
}

impl SessionParams {
    #[must_use]
    pub fn new(target: &DeviceTarget, kind: DeviceKind) -> Self {
        Self {
            device_id: target.id.clone(),
            address: target.address.clone(),
            local_key: target.local_key.clone(),
            version: target.version,
            kind,
        }
    }
}

/// An open session to one device.
pub trait DeviceSession: Send + Sync {
    /// Set the attribute identified by `key` to `value`.
    fn set_value(
        &self,
        key: &str,
        value: bool,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// Opens device sessions.
pub trait DeviceConnector: Send + Sync {
    type Session: DeviceSession;

    /// Connect to the device and declare its protocol version.
    fn open(
        &self,
        params: SessionParams,
    ) -> impl Future<Output = Result<Self::Session, GatewayError>> + Send;
}

impl<T: DeviceConnector> DeviceConnector for std::sync::Arc<T> {
    type Session = T::Session;

    fn open(
        &self,
        params: SessionParams,
    ) -> impl Future<Output = Result<Self::Session, GatewayError>> + Send {
        (**self).open(params)
    }
}
