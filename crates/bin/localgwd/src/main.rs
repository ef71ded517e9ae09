//! # localgwd — localgw daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` registry pool and run migrations
//! - Register the device drivers over the device connector
//! - Start the background workers
//! - Build the axum router around the command dispatcher
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod shutdown;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use localgw_adapter_http_axum::state::AppState;
use localgw_adapter_storage_sqlite_sqlx::SqliteRegistry;
use localgw_adapter_storage_sqlite_sqlx::pool::Config as DatabaseConfig;
use localgw_adapter_virtual::VirtualConnector;
use localgw_app::drivers::DriverRegistry;
use localgw_app::services::command_dispatcher::CommandDispatcher;
use localgw_app::workers::{DeviceMonitor, RoutingScanner, WorkerHandle, spawn_worker};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Registry
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
        max_connections: config.database.max_connections,
    }
    .build()
    .await
    .context("opening registry database")?;
    let registry = SqliteRegistry::new(db.pool().clone());

    // Drivers
    let mut drivers = DriverRegistry::new();
    localgw_adapter_tuya::register(&mut drivers, Arc::new(VirtualConnector::new()));
    tracing::info!(?drivers, "device drivers registered");

    // Background workers
    let timeouts = config.timeouts();
    let mut workers: Vec<WorkerHandle> = Vec::new();
    if config.workers.monitor_enabled {
        workers.push(spawn_worker(
            registry.clone(),
            DeviceMonitor::new(drivers.clone(), timeouts.registry),
            config.workers.monitor_interval(),
            timeouts.registry,
        ));
    }
    if config.workers.scanner_enabled {
        workers.push(spawn_worker(
            registry.clone(),
            RoutingScanner::new(timeouts.registry),
            config.workers.scanner_interval(),
            timeouts.registry,
        ));
    }

    // HTTP
    let dispatcher = CommandDispatcher::new(registry, drivers, timeouts);
    let app = localgw_adapter_http_axum::router::build(AppState::new(dispatcher));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "localgwd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await
        .context("serving HTTP")?;

    for worker in workers {
        if worker.is_finished() {
            tracing::warn!(worker = worker.name(), "background worker exited before shutdown");
        }
        tracing::debug!(worker = worker.name(), "stopping background worker");
        worker.shutdown().await;
    }
    tracing::info!("localgwd stopped");

    Ok(())
}
