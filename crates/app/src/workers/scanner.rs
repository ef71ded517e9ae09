//! Routing scanner — finds aliases that route to devices the registry lacks.

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use localgw_domain::device::{RoutingEntry, decode_record};
use localgw_domain::error::GatewayError;

use crate::ports::{Filter, RegistryClient, Table};
use crate::timeout::bounded;
use crate::workers::BackgroundWorker;

/// Summary of the latest scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub routes: usize,
    /// Aliases whose `external_device_id` has no device record.
    pub dangling: BTreeSet<String>,
}

/// Periodically cross-checks the routing table against the device table.
pub struct RoutingScanner {
    timeout: Duration,
    report: ScanReport,
}

impl RoutingScanner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            report: ScanReport::default(),
        }
    }

    #[must_use]
    pub fn report(&self) -> &ScanReport {
        &self.report
    }
}

impl BackgroundWorker for RoutingScanner {
    fn name(&self) -> &'static str {
        "routing-scanner"
    }

    async fn run_once<C: RegistryClient>(&mut self, client: &C) -> Result<(), GatewayError> {
        let routes = bounded(
            "registry read",
            self.timeout,
            client.read_multiple(Table::DeviceRouting, &Filter::new()),
        )
        .await?
        .unwrap_or_default();
        let devices = bounded(
            "registry read",
            self.timeout,
            client.read_multiple(Table::Device, &Filter::new()),
        )
        .await?
        .unwrap_or_default();

        let known: HashSet<&str> = devices
            .iter()
            .filter_map(|row| row.get("id").and_then(serde_json::Value::as_str))
            .collect();

        let mut report = ScanReport {
            routes: routes.len(),
            ..ScanReport::default()
        };
        for row in routes {
            let route: RoutingEntry = match decode_record(Table::DeviceRouting.as_str(), row) {
                Ok(route) => route,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed routing entry");
                    continue;
                }
            };
            if !known.contains(route.external_device_id.as_str()) {
                if !self.report.dangling.contains(&route.internal_device_id) {
                    tracing::warn!(
                        alias = %route.internal_device_id,
                        external_device_id = %route.external_device_id,
                        "alias routes to an unknown device"
                    );
                }
                report.dangling.insert(route.internal_device_id);
            }
        }
        for alias in self.report.dangling.difference(&report.dangling) {
            tracing::info!(%alias, "alias routes to a known device again");
        }

        tracing::debug!(
            routes = report.routes,
            dangling = report.dangling.len(),
            "routing scan complete"
        );
        self.report = report;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RegistryConnector;
    use crate::testing::InMemoryRegistry;

    #[tokio::test]
    async fn should_report_no_dangling_routes_when_consistent() {
        let registry = InMemoryRegistry::scenario();
        let client = registry.connect().await.unwrap();
        let mut scanner = RoutingScanner::new(Duration::from_secs(1));

        scanner.run_once(&client).await.unwrap();

        assert_eq!(scanner.report().routes, 1);
        assert!(scanner.report().dangling.is_empty());
    }

    #[tokio::test]
    async fn should_report_alias_routing_to_missing_device() {
        let registry = InMemoryRegistry::scenario().with_route("porch", "ghost");
        let client = registry.connect().await.unwrap();
        let mut scanner = RoutingScanner::new(Duration::from_secs(1));

        scanner.run_once(&client).await.unwrap();

        assert_eq!(scanner.report().routes, 2);
        assert_eq!(
            scanner.report().dangling.iter().collect::<Vec<_>>(),
            ["porch"]
        );
    }

    #[tokio::test]
    async fn should_clear_dangling_alias_once_device_appears() {
        let registry = InMemoryRegistry::scenario().with_route("porch", "ghost");
        let client = registry.connect().await.unwrap();
        let mut scanner = RoutingScanner::new(Duration::from_secs(1));
        scanner.run_once(&client).await.unwrap();

        let _ = registry.with_device("ghost", "TUYA", "BULB", "3.3");
        scanner.run_once(&client).await.unwrap();

        assert!(scanner.report().dangling.is_empty());
    }

    #[tokio::test]
    async fn should_propagate_registry_failure() {
        let registry = InMemoryRegistry::scenario();
        registry.fail_reads_on(Table::Device);
        let client = registry.connect().await.unwrap();
        let mut scanner = RoutingScanner::new(Duration::from_secs(1));

        let result = scanner.run_once(&client).await;

        assert!(matches!(result, Err(GatewayError::Registry(_))));
    }
}
