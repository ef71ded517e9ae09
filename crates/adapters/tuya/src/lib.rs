//! # localgw-adapter-tuya
//!
//! Tuya device drivers. Each driver opens a session through the
//! [`DeviceConnector`] port, declares the device's protocol version and
//! writes a single data point.
//!
//! ## Provided drivers
//!
//! | Driver | Vendor | Class | Session kind |
//! |--------|--------|-------|--------------|
//! | [`TuyaBulbDriver`] | `TUYA` | `BULB` | `DeviceKind::Bulb` |
//! | [`TuyaOutletDriver`] | `TUYA` | `OUTLET` | `DeviceKind::Outlet` |
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `localgw-app` and `localgw-domain`.

mod bulb;
mod outlet;
mod session;
#[cfg(test)]
mod testing;

pub use bulb::TuyaBulbDriver;
pub use outlet::TuyaOutletDriver;

use std::sync::Arc;

use localgw_app::drivers::DriverRegistry;
use localgw_app::ports::DeviceConnector;

/// Vendor id the Tuya drivers register under.
pub const VENDOR: &str = "TUYA";

/// Register the bulb and outlet drivers, both sharing `connector`.
pub fn register<C>(registry: &mut DriverRegistry, connector: Arc<C>)
where
    C: DeviceConnector + 'static,
{
    registry
        .register(Arc::new(TuyaBulbDriver::new(Arc::clone(&connector))))
        .register(Arc::new(TuyaOutletDriver::new(connector)));
}
