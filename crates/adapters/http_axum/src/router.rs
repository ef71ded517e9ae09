//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use localgw_app::ports::RegistryConnector;

use crate::api::command;
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<R>(state: AppState<R>) -> Router
where
    R: RegistryConnector + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/{external_device_id}/{attribute}/{value}",
            get(command::set_attribute::<R>).post(command::set_attribute::<R>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use localgw_app::drivers::DriverRegistry;
    use localgw_app::ports::{DeviceDriver, Filter, Record, RegistryClient, Table};
    use localgw_app::services::command_dispatcher::CommandDispatcher;
    use localgw_app::timeout::Timeouts;
    use localgw_domain::device::{DeviceTarget, DriverKey};
    use localgw_domain::error::GatewayError;
    use serde_json::json;
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct StubRegistry {
        rows: Arc<Vec<(Table, Record)>>,
    }

    impl RegistryClient for StubRegistry {
        async fn read_multiple(
            &self,
            table: Table,
            filter: &Filter,
        ) -> Result<Option<Vec<Record>>, GatewayError> {
            let rows: Vec<Record> = self
                .rows
                .iter()
                .filter(|(t, row)| *t == table && filter.matches(row))
                .map(|(_, row)| row.clone())
                .collect();
            Ok((!rows.is_empty()).then_some(rows))
        }

        async fn logoff(&self) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    impl RegistryConnector for StubRegistry {
        type Client = StubRegistry;

        async fn connect(&self) -> Result<StubRegistry, GatewayError> {
            Ok(self.clone())
        }
    }

    #[derive(Default)]
    struct StubDriver {
        calls: Mutex<Vec<(String, String, bool)>>,
        fail: bool,
    }

    #[async_trait]
    impl DeviceDriver for StubDriver {
        fn key(&self) -> DriverKey {
            DriverKey::new("TUYA", "BULB")
        }

        async fn set_attribute(
            &self,
            target: &DeviceTarget,
            protocol_key: &str,
            value: bool,
        ) -> Result<(), GatewayError> {
            if self.fail {
                return Err(GatewayError::device("device unreachable"));
            }
            self.calls
                .lock()
                .unwrap()
                .push((target.id.clone(), protocol_key.to_string(), value));
            Ok(())
        }
    }

    fn record(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn registry() -> StubRegistry {
        StubRegistry {
            rows: Arc::new(vec![
                (
                    Table::DeviceRouting,
                    record(json!({ "internal_device_id": "lamp1", "external_device_id": "d1" })),
                ),
                (
                    Table::DeviceRouting,
                    record(json!({ "internal_device_id": "sensor1", "external_device_id": "a1" })),
                ),
                (
                    Table::Device,
                    record(json!({
                        "id": "d1", "vendor_id": "TUYA", "class_id": "BULB",
                        "address": "10.0.0.5", "local_key": "K", "version": "3.3"
                    })),
                ),
                (
                    Table::Device,
                    record(json!({
                        "id": "a1", "vendor_id": "ACME", "class_id": "BULB",
                        "address": "10.0.0.9", "local_key": "Z", "version": "1.0"
                    })),
                ),
                (
                    Table::DeviceAttribute,
                    record(json!({
                        "name": "power",
                        "class_id": "BULB",
                        "device_attribute_key": "20",
                    })),
                ),
            ]),
        }
    }

    fn app(driver: Arc<StubDriver>) -> Router {
        let mut drivers = DriverRegistry::new();
        drivers.register(driver);
        let dispatcher = CommandDispatcher::new(registry(), drivers, Timeouts::default());
        build(AppState::new(dispatcher))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let (status, body) = send(app(Arc::default()), Method::GET, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn should_dispatch_command_when_get() {
        let driver = Arc::new(StubDriver::default());

        let (status, body) = send(app(Arc::clone(&driver)), Method::GET, "/lamp1/power/on").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
        assert_eq!(
            *driver.calls.lock().unwrap(),
            vec![("d1".to_string(), "20".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn should_dispatch_command_when_post() {
        let driver = Arc::new(StubDriver::default());

        let (status, _) = send(app(Arc::clone(&driver)), Method::POST, "/lamp1/power/off").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            *driver.calls.lock().unwrap(),
            vec![("d1".to_string(), "20".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn should_return_not_found_with_detail_when_alias_unknown() {
        let (status, body) =
            send(app(Arc::default()), Method::GET, "/unknown-alias/power/on").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "device routing not found: unknown-alias");
    }

    #[tokio::test]
    async fn should_return_not_found_when_attribute_unknown() {
        let (status, body) = send(app(Arc::default()), Method::GET, "/lamp1/brightness/on").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("attribute:brightness"));
    }

    #[tokio::test]
    async fn should_return_ok_without_driver_call_when_vendor_unsupported() {
        let driver = Arc::new(StubDriver::default());

        let (status, body) = send(app(Arc::clone(&driver)), Method::GET, "/sensor1/power/on").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
        assert!(driver.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_internal_error_with_detail_when_driver_fails() {
        let driver = Arc::new(StubDriver {
            fail: true,
            ..StubDriver::default()
        });

        let (status, body) = send(app(driver), Method::GET, "/lamp1/power/on").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "device error: device unreachable");
    }

    #[tokio::test]
    async fn should_reject_unsupported_method() {
        let (status, _) = send(app(Arc::default()), Method::DELETE, "/lamp1/power/on").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
