//! Driver port — one control strategy per `(vendor, class)` pair.

use async_trait::async_trait;

use localgw_domain::device::{DeviceTarget, DriverKey};
use localgw_domain::error::GatewayError;

/// Knows how to reach one kind of device and write a single attribute.
///
/// Drivers are stored as trait objects in the
/// [`DriverRegistry`](crate::drivers::DriverRegistry), so the trait is
/// object-safe.
#[async_trait]
pub trait DeviceDriver: Send + Sync {
    /// The `(vendor, class)` pair this driver handles.
    fn key(&self) -> DriverKey;

    /// Open a session to `target`, write `value` to `protocol_key`, and drop
    /// the session.
    async fn set_attribute(
        &self,
        target: &DeviceTarget,
        protocol_key: &str,
        value: bool,
    ) -> Result<(), GatewayError>;
}
