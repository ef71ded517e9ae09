use localgw_domain::error::GatewayError;

/// Failures reported by simulated devices.
#[derive(Debug, thiserror::Error)]
pub enum VirtualDeviceError {
    #[error("no virtual device with id {device_id}")]
    UnknownDevice { device_id: String },
    #[error("local key rejected by device {device_id}")]
    KeyMismatch { device_id: String },
    #[error("device {device_id} at {address} is unreachable")]
    Unreachable { device_id: String, address: String },
}

impl From<VirtualDeviceError> for GatewayError {
    fn from(err: VirtualDeviceError) -> Self {
        GatewayError::device(err)
    }
}
