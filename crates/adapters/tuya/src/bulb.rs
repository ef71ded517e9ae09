//! Tuya bulb driver.

use std::sync::Arc;

use async_trait::async_trait;

use localgw_app::ports::{DeviceConnector, DeviceDriver, DeviceKind};
use localgw_domain::device::{DeviceTarget, DriverKey};
use localgw_domain::error::GatewayError;

use crate::VENDOR;
use crate::session::write_once;

/// Switches Tuya bulbs through a [`DeviceKind::Bulb`] session.
pub struct TuyaBulbDriver<C> {
    connector: Arc<C>,
}

impl<C> TuyaBulbDriver<C> {
    #[must_use]
    pub fn new(connector: Arc<C>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl<C: DeviceConnector + 'static> DeviceDriver for TuyaBulbDriver<C> {
    fn key(&self) -> DriverKey {
        DriverKey::new(VENDOR, "BULB")
    }

    async fn set_attribute(
        &self,
        target: &DeviceTarget,
        protocol_key: &str,
        value: bool,
    ) -> Result<(), GatewayError> {
        write_once(
            self.connector.as_ref(),
            DeviceKind::Bulb,
            target,
            protocol_key,
            value,
        )
        .await
    }
}
