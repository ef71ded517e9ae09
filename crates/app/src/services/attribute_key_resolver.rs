//! Attribute key resolver — human attribute name + device class to protocol key.

use std::time::Duration;

use localgw_domain::device::AttributeKeyEntry;
use localgw_domain::error::{GatewayError, LookupError};

use crate::ports::{Filter, RegistryClient, Table};
use crate::services::first_record;
use crate::timeout::bounded;

/// Looks up the vendor protocol key for an attribute of a device class.
#[derive(Debug, Clone)]
pub struct AttributeKeyResolver {
    timeout: Duration,
}

impl AttributeKeyResolver {
    /// Create a resolver whose registry reads are bounded by `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Resolve `attribute` for `class_id`.
    ///
    /// Both values are matched exactly; `class_id` is passed as stored on the
    /// device record, without case normalization.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::AttributeKeyNotFound`] when no entry matches, or
    /// a registry, timeout or validation error.
    #[tracing::instrument(skip(self, client))]
    pub async fn resolve<C: RegistryClient>(
        &self,
        client: &C,
        attribute: &str,
        class_id: &str,
    ) -> Result<String, GatewayError> {
        let filter = Filter::new()
            .with("name", attribute)
            .with("class_id", class_id);
        let rows = bounded(
            "registry read",
            self.timeout,
            client.read_multiple(Table::DeviceAttribute, &filter),
        )
        .await?;

        let entry: AttributeKeyEntry = first_record(Table::DeviceAttribute, rows)?.ok_or_else(|| {
            LookupError::AttributeKeyNotFound {
                attribute: attribute.to_string(),
                class_id: class_id.to_string(),
            }
        })?;

        Ok(entry.device_attribute_key)
    }
}
