//! In-memory port implementations shared by the unit tests of this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use localgw_domain::device::{DeviceTarget, DriverKey};
use localgw_domain::error::GatewayError;

use crate::ports::{DeviceDriver, Filter, Record, RegistryClient, RegistryConnector, Table};

#[derive(Default)]
struct RegistryState {
    tables: Mutex<HashMap<Table, Vec<Record>>>,
    reads: Mutex<Vec<Table>>,
    connects: AtomicUsize,
    logoffs: AtomicUsize,
    failing_table: Mutex<Option<Table>>,
    fail_connect: AtomicBool,
    fail_logoff: AtomicBool,
}

/// Registry backed by in-memory tables, counting sessions and reads.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRegistry {
    state: Arc<RegistryState>,
}

fn object(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected a JSON object"),
    }
}

impl InMemoryRegistry {
    pub(crate) fn insert(&self, table: Table, record: serde_json::Value) {
        self.state
            .tables
            .lock()
            .unwrap()
            .entry(table)
            .or_default()
            .push(object(record));
    }

    pub(crate) fn remove_where(&self, table: Table, filter: &Filter) {
        if let Some(rows) = self.state.tables.lock().unwrap().get_mut(&table) {
            rows.retain(|row| !filter.matches(row));
        }
    }

    pub(crate) fn with_route(self, alias: &str, device_id: &str) -> Self {
        self.insert(
            Table::DeviceRouting,
            json!({ "internal_device_id": alias, "external_device_id": device_id }),
        );
        self
    }

    pub(crate) fn with_device(self, id: &str, vendor: &str, class: &str, version: &str) -> Self {
        self.insert(
            Table::Device,
            json!({
                "id": id,
                "vendor_id": vendor,
                "class_id": class,
                "address": "10.0.0.5",
                "local_key": "K",
                "version": version,
            }),
        );
        self
    }

    pub(crate) fn with_attribute(self, name: &str, class: &str, key: &str) -> Self {
        self.insert(
            Table::DeviceAttribute,
            json!({ "name": name, "class_id": class, "device_attribute_key": key }),
        );
        self
    }

    pub(crate) fn fail_reads_on(&self, table: Table) {
        *self.state.failing_table.lock().unwrap() = Some(table);
    }

    pub(crate) fn fail_connect(&self) {
        self.state.fail_connect.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_logoff(&self) {
        self.state.fail_logoff.store(true, Ordering::SeqCst);
    }

    pub(crate) fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub(crate) fn logoffs(&self) -> usize {
        self.state.logoffs.load(Ordering::SeqCst)
    }

    pub(crate) fn reads(&self) -> Vec<Table> {
        self.state.reads.lock().unwrap().clone()
    }

    /// `lamp1` → `d1` (TUYA/BULB, version 3.3); `power` on BULB → `20`.
    pub(crate) fn scenario() -> Self {
        Self::default()
            .with_route("lamp1", "d1")
            .with_device("d1", "TUYA", "BULB", "3.3")
            .with_attribute("power", "BULB", "20")
    }
}

pub(crate) struct InMemoryClient {
    state: Arc<RegistryState>,
    open: AtomicBool,
}

impl RegistryClient for InMemoryClient {
    async fn read_multiple(
        &self,
        table: Table,
        filter: &Filter,
    ) -> Result<Option<Vec<Record>>, GatewayError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(GatewayError::registry("session closed"));
        }
        self.state.reads.lock().unwrap().push(table);
        if *self.state.failing_table.lock().unwrap() == Some(table) {
            return Err(GatewayError::registry("connection reset"));
        }
        let tables = self.state.tables.lock().unwrap();
        let rows: Vec<Record> = tables
            .get(&table)
            .map(|rows| rows.iter().filter(|row| filter.matches(row)).cloned().collect())
            .unwrap_or_default();
        Ok(if rows.is_empty() { None } else { Some(rows) })
    }

    async fn logoff(&self) -> Result<(), GatewayError> {
        self.open.store(false, Ordering::SeqCst);
        self.state.logoffs.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_logoff.load(Ordering::SeqCst) {
            return Err(GatewayError::registry("logoff rejected"));
        }
        Ok(())
    }
}

impl RegistryConnector for InMemoryRegistry {
    type Client = InMemoryClient;

    async fn connect(&self) -> Result<InMemoryClient, GatewayError> {
        if self.state.fail_connect.load(Ordering::SeqCst) {
            return Err(GatewayError::registry("registry unreachable"));
        }
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryClient {
            state: Arc::clone(&self.state),
            open: AtomicBool::new(true),
        })
    }
}

/// One recorded driver invocation: `(device_id, protocol_key, value)`.
pub(crate) type DriverCall = (String, String, bool);

/// Driver that records every invocation and optionally fails.
pub(crate) struct RecordingDriver {
    key: DriverKey,
    calls: Mutex<Vec<DriverCall>>,
    failure: Option<&'static str>,
}

impl RecordingDriver {
    pub(crate) fn new(vendor: &str, class: &str) -> Arc<Self> {
        Arc::new(Self {
            key: DriverKey::new(vendor, class),
            calls: Mutex::new(Vec::new()),
            failure: None,
        })
    }

    pub(crate) fn failing(vendor: &str, class: &str, failure: &'static str) -> Arc<Self> {
        Arc::new(Self {
            key: DriverKey::new(vendor, class),
            calls: Mutex::new(Vec::new()),
            failure: Some(failure),
        })
    }

    pub(crate) fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceDriver for RecordingDriver {
    fn key(&self) -> DriverKey {
        self.key.clone()
    }

    async fn set_attribute(
        &self,
        target: &DeviceTarget,
        protocol_key: &str,
        value: bool,
    ) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((target.id.clone(), protocol_key.to_string(), value));
        match self.failure {
            Some(reason) => Err(GatewayError::device(reason)),
            None => Ok(()),
        }
    }
}
