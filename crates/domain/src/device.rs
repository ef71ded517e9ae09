//! Device registry records and the connection parameters derived from them.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Maps an externally-addressable alias to an internal device id.
///
/// Stored in the `iot_device_routing` table. The column naming is historical:
/// `internal_device_id` holds the caller-facing alias and
/// `external_device_id` holds the device record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingEntry {
    pub internal_device_id: String,
    pub external_device_id: String,
}

/// One physical device, as stored in `iot_device`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub id: String,
    pub vendor_id: String,
    pub class_id: String,
    pub address: String,
    pub local_key: String,
    /// Raw protocol version; the registry may hold it as text or as a number.
    #[serde(deserialize_with = "text_or_number")]
    pub version: String,
}

impl DeviceRecord {
    /// The `(vendor, class)` pair used to pick a driver.
    #[must_use]
    pub fn driver_key(&self) -> DriverKey {
        DriverKey::new(&self.vendor_id, &self.class_id)
    }

    /// Parse the stored protocol version.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidVersion`] when `version` is not a
    /// finite, positive number.
    pub fn protocol_version(&self) -> Result<ProtocolVersion, ValidationError> {
        self.version
            .parse()
            .map_err(|()| ValidationError::InvalidVersion {
                device_id: self.id.clone(),
                version: self.version.clone(),
            })
    }
}

/// Maps a human attribute name and device class to a vendor protocol key.
///
/// Stored in `iot_device_attribute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeKeyEntry {
    pub name: String,
    pub class_id: String,
    pub device_attribute_key: String,
}

/// Numeric protocol version declared to the device when opening a session.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ProtocolVersion(f64);

impl FromStr for ProtocolVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| ())?;
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(())
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            self.0.fmt(f)
        }
    }
}

/// Everything a driver needs to open a session, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTarget {
    pub id: String,
    pub address: String,
    pub local_key: String,
    pub version: ProtocolVersion,
}

impl TryFrom<&DeviceRecord> for DeviceTarget {
    type Error = ValidationError;

    fn try_from(record: &DeviceRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id.clone(),
            address: record.address.clone(),
            local_key: record.local_key.clone(),
            version: record.protocol_version()?,
        })
    }
}

/// Uppercase-normalized `(vendor, class)` pair identifying a driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriverKey {
    vendor: String,
    class: String,
}

impl DriverKey {
    #[must_use]
    pub fn new(vendor: &str, class: &str) -> Self {
        Self {
            vendor: vendor.to_uppercase(),
            class: class.to_uppercase(),
        }
    }

    #[must_use]
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }
}

impl fmt::Display for DriverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.vendor, self.class)
    }
}

/// Decode one registry record (a JSON object) into a typed value.
///
/// # Errors
///
/// Returns [`ValidationError::MalformedRecord`] when fields are missing or
/// have the wrong type.
pub fn decode_record<T: DeserializeOwned>(
    table: &'static str,
    record: serde_json::Map<String, serde_json::Value>,
) -> Result<T, ValidationError> {
    serde_json::from_value(serde_json::Value::Object(record)).map_err(|err| {
        ValidationError::MalformedRecord {
            table,
            reason: err.to_string(),
        }
    })
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
