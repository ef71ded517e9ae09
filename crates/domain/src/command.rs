//! Commands — one inbound "set attribute" instruction and its outcome.

use crate::error::GatewayError;

/// The only raw value recognised as "true".
pub const ON: &str = "on";

/// One inbound instruction, as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Caller-facing device alias.
    pub alias: String,
    /// Human-readable attribute name (matched exactly, case-sensitive).
    pub attribute: String,
    /// Raw value as received.
    pub raw_value: String,
}

impl CommandRequest {
    pub fn new(
        alias: impl Into<String>,
        attribute: impl Into<String>,
        raw_value: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            attribute: attribute.into(),
            raw_value: raw_value.into(),
        }
    }

    /// The boolean written to the device.
    #[must_use]
    pub fn normalized_value(&self) -> bool {
        normalize_value(&self.raw_value)
    }
}

/// `"on"` maps to `true`; every other string, including `"ON"`, maps to `false`.
#[must_use]
pub fn normalize_value(raw: &str) -> bool {
    raw == ON
}

/// What a successful dispatch did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The driver wrote `value` to `protocol_key` on the device.
    Applied {
        device_id: String,
        protocol_key: String,
        value: bool,
    },
    /// No driver is registered for the device's vendor/class; nothing was sent.
    Unsupported {
        device_id: String,
        vendor_id: String,
        class_id: String,
    },
}

/// Result of one dispatch: the outcome, or the classified failure.
pub type DispatchResult = Result<DispatchOutcome, GatewayError>;
