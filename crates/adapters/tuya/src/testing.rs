//! Connector stub recording every session and write.

use std::sync::{Arc, Mutex};

use localgw_app::ports::{DeviceConnector, DeviceSession, SessionParams};
use localgw_domain::device::DeviceTarget;
use localgw_domain::error::GatewayError;

#[derive(Default)]
pub(crate) struct RecordingConnector {
    pub(crate) opened: Mutex<Vec<SessionParams>>,
    pub(crate) writes: Arc<Mutex<Vec<(String, String, bool)>>>,
    pub(crate) refuse: bool,
}

pub(crate) struct RecordingSession {
    device_id: String,
    writes: Arc<Mutex<Vec<(String, String, bool)>>>,
}

impl DeviceSession for RecordingSession {
    async fn set_value(&self, key: &str, value: bool) -> Result<(), GatewayError> {
        self.writes
            .lock()
            .unwrap()
            .push((self.device_id.clone(), key.to_string(), value));
        Ok(())
    }
}

impl DeviceConnector for RecordingConnector {
    type Session = RecordingSession;

    async fn open(&self, params: SessionParams) -> Result<RecordingSession, GatewayError> {
        if self.refuse {
            return Err(GatewayError::device("connection refused"));
        }
        let device_id = params.device_id.clone();
        self.opened.lock().unwrap().push(params);
        Ok(RecordingSession {
            device_id,
            writes: Arc::clone(&self.writes),
        })
    }
}

pub(crate) fn target() -> DeviceTarget {
    DeviceTarget {
        id: "d1".to_string(),
        address: "10.0.0.5".to_string(),
        local_key: "K".to_string(),
        version: "3.3".parse().unwrap(),
    }
}
