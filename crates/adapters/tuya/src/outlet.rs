//! Tuya outlet driver.

use std::sync::Arc;

use async_trait::async_trait;

use localgw_app::ports::{DeviceConnector, DeviceDriver, DeviceKind};
use localgw_domain::device::{DeviceTarget, DriverKey};
use localgw_domain::error::GatewayError;

use crate::VENDOR;
use crate::session::write_once;

/// Switches Tuya smart plugs through a [`DeviceKind::Outlet`] session.
pub struct TuyaOutletDriver<C> {
    connector: Arc<C>,
}

impl<C> TuyaOutletDriver<C> {
    #[must_use]
    pub fn new(connector: Arc<C>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl<C: DeviceConnector + 'static> DeviceDriver for TuyaOutletDriver<C> {
    fn key(&self) -> DriverKey {
        DriverKey::new(VENDOR, "OUTLET")
    }

    async fn set_attribute(
        &self,
        target: &DeviceTarget,
        protocol_key: &str,
        value: bool,
    ) -> Result<(), GatewayError> {
        write_once(
            self.connector.as_ref(),
            DeviceKind::Outlet,
            target,
            protocol_key,
            value,
        )
        .await
    }
}
