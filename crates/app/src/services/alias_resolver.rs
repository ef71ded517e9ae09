//! Alias resolver — caller-facing alias to device record, through the routing table.

use std::time::Duration;

use localgw_domain::device::{DeviceRecord, RoutingEntry};
use localgw_domain::error::{GatewayError, LookupError};

use crate::ports::{Filter, RegistryClient, Table};
use crate::services::first_record;
use crate::timeout::bounded;

/// Resolves an alias in two reads: routing entry, then device record.
#[derive(Debug, Clone)]
pub struct AliasResolver {
    timeout: Duration,
}

impl AliasResolver {
    /// Create a resolver whose registry reads are bounded by `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Resolve `alias` to the device it routes to.
    ///
    /// When several rows match at either step, the first one wins.
    ///
    /// # Errors
    ///
    /// - [`LookupError::RoutingNotFound`] when no routing entry has
    ///   `internal_device_id == alias`
    /// - [`LookupError::DeviceNotFound`] when the routed device id has no record
    /// - a registry, timeout or validation error otherwise
    #[tracing::instrument(skip(self, client))]
    pub async fn resolve<C: RegistryClient>(
        &self,
        client: &C,
        alias: &str,
    ) -> Result<DeviceRecord, GatewayError> {
        let filter = Filter::new().with("internal_device_id", alias);
        let rows = bounded(
            "registry read",
            self.timeout,
            client.read_multiple(Table::DeviceRouting, &filter),
        )
        .await?;
        let route: RoutingEntry =
            first_record(Table::DeviceRouting, rows)?.ok_or_else(|| LookupError::RoutingNotFound {
                alias: alias.to_string(),
            })?;

        let filter = Filter::new().with("id", route.external_device_id.as_str());
        let rows = bounded(
            "registry read",
            self.timeout,
            client.read_multiple(Table::Device, &filter),
        )
        .await?;
        let device: DeviceRecord =
            first_record(Table::Device, rows)?.ok_or_else(|| LookupError::DeviceNotFound {
                external_device_id: route.external_device_id.clone(),
            })?;

        tracing::debug!(device_id = %device.id, "alias resolved");
        Ok(device)
    }
}
