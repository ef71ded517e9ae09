//! One-shot session shared by the Tuya drivers.

use localgw_app::ports::{DeviceConnector, DeviceKind, DeviceSession, SessionParams};
use localgw_domain::device::DeviceTarget;
use localgw_domain::error::GatewayError;

/// Open a session of `kind` to `target`, write `value` to `key`, drop the session.
pub(crate) async fn write_once<C: DeviceConnector>(
    connector: &C,
    kind: DeviceKind,
    target: &DeviceTarget,
    key: &str,
    value: bool,
) -> Result<(), GatewayError> {
    let session = connector.open(SessionParams::new(target, kind)).await?;
    tracing::debug!(
        device_id = %target.id,
        address = %target.address,
        version = %target.version,
        %kind,
        key,
        value,
        "setting Tuya data point"
    );
    session.set_value(key, value).await
}
