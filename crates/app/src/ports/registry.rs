//! Registry port — session-scoped key lookups over the device registry.
//!
//! The registry holds three tables the gateway reads but never writes:
//! routing aliases, device records and attribute keys. Every read happens
//! inside a session obtained from a [`RegistryConnector`]; the session must be
//! released with [`RegistryClient::logoff`] once the caller is done.

use std::future::Future;

use localgw_domain::error::GatewayError;

/// One registry row, as a JSON object keyed by column name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Tables the gateway reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Alias → device id (`internal_device_id`, `external_device_id`).
    DeviceRouting,
    /// Device records (`id`, `vendor_id`, `class_id`, `address`, `local_key`, `version`).
    Device,
    /// Attribute name + class → protocol key (`name`, `class_id`, `device_attribute_key`).
    DeviceAttribute,
}

impl Table {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeviceRouting => "iot_device_routing",
            Self::Device => "iot_device",
            Self::DeviceAttribute => "iot_device_attribute",
        }
    }

    /// Columns a [`Filter`] may reference for this table.
    #[must_use]
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::DeviceRouting => &["internal_device_id", "external_device_id"],
            Self::Device => &["id", "vendor_id", "class_id", "address", "local_key", "version"],
            Self::DeviceAttribute => &["name", "class_id", "device_attribute_key"],
        }
    }
}

/// Conjunction of exact column equalities. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<(&'static str, String)>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `column == value` clause.
    #[must_use]
    pub fn with(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.clauses.push((column, value.into()));
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.clauses.iter().map(|(column, value)| (*column, value.as_str()))
    }

    /// Evaluate the filter against an in-memory record.
    ///
    /// Numbers compare by their textual form, anything else never matches.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.iter().all(|(column, expected)| match record.get(column) {
            Some(serde_json::Value::String(actual)) => actual == expected,
            Some(serde_json::Value::Number(actual)) => actual.to_string() == expected,
            _ => false,
        })
    }
}

/// An open registry session.
pub trait RegistryClient: Send + Sync {
    /// Read every row of `table` matching `filter`.
    ///
    /// Returns `Ok(None)` when nothing matches.
    fn read_multiple(
        &self,
        table: Table,
        filter: &Filter,
    ) -> impl Future<Output = Result<Option<Vec<Record>>, GatewayError>> + Send;

    /// Release the session. Further reads fail.
    fn logoff(&self) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// Opens registry sessions.
pub trait RegistryConnector: Send + Sync {
    type Client: RegistryClient + 'static;

    /// Acquire a fresh session.
    fn connect(&self) -> impl Future<Output = Result<Self::Client, GatewayError>> + Send;
}

impl<T: RegistryConnector> RegistryConnector for std::sync::Arc<T> {
    type Client = T::Client;

    fn connect(&self) -> impl Future<Output = Result<Self::Client, GatewayError>> + Send {
        (**self).connect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn should_match_every_record_when_filter_is_empty() {
        assert!(Filter::new().matches(&record(json!({ "id": "d1" }))));
    }

    #[test]
    fn should_require_all_clauses_to_match() {
        let row = record(json!({ "name": "power", "class_id": "BULB" }));
        assert!(Filter::new().with("name", "power").with("class_id", "BULB").matches(&row));
        assert!(!Filter::new().with("name", "power").with("class_id", "bulb").matches(&row));
    }

    #[test]
    fn should_compare_numbers_by_text() {
        let row = record(json!({ "version": 3.3 }));
        assert!(Filter::new().with("version", "3.3").matches(&row));
    }

    #[test]
    fn should_not_match_missing_column() {
        let row = record(json!({ "id": "d1" }));
        assert!(!Filter::new().with("address", "10.0.0.5").matches(&row));
    }

    #[test]
    fn should_expose_table_names() {
        assert_eq!(Table::DeviceRouting.as_str(), "iot_device_routing");
        assert_eq!(Table::Device.as_str(), "iot_device");
        assert_eq!(Table::DeviceAttribute.as_str(), "iot_device_attribute");
    }
}
