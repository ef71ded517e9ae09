//! Background workers — long-lived tasks that watch the device registry.
//!
//! Each worker runs on its own tokio task, owns its own registry session and
//! is stopped through the [`WorkerHandle`] returned by [`spawn_worker`].
//! Failures are logged and retried on the next tick; they never reach the
//! request path.

pub mod monitor;
pub mod scanner;

pub use monitor::DeviceMonitor;
pub use scanner::RoutingScanner;

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use localgw_domain::error::GatewayError;

use crate::ports::{RegistryClient, RegistryConnector};
use crate::timeout::bounded;

/// A periodic pass over the registry.
pub trait BackgroundWorker: Send + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Run one pass using the worker's session.
    fn run_once<C: RegistryClient>(
        &mut self,
        client: &C,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// Owner of a running worker task.
pub struct WorkerHandle {
    name: &'static str,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WorkerHandle {
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Ask the worker to stop and wait until it has released its session.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            tracing::error!(
                worker = self.name,
                error = %err,
                "background worker terminated abnormally"
            );
        }
    }
}

/// Spawn `worker` on its own task, running a pass every `interval`.
///
/// The task opens its own registry session and keeps it between passes. A
/// failed pass drops the session; the next tick opens a fresh one.
pub fn spawn_worker<R, W>(
    connector: R,
    mut worker: W,
    interval: Duration,
    registry_timeout: Duration,
) -> WorkerHandle
where
    R: RegistryConnector + 'static,
    W: BackgroundWorker,
{
    let name = worker.name();
    let (shutdown, mut stop) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut session: Option<R::Client> = None;

        tracing::info!(
            worker = name,
            interval_secs = interval.as_secs(),
            "background worker started"
        );

        loop {
            tokio::select! {
                _ = stop.changed() => break,
                _ = ticker.tick() => {}
            }

            let client = match session.take() {
                Some(client) => client,
                None => {
                    match bounded("registry connect", registry_timeout, connector.connect()).await {
                        Ok(client) => client,
                        Err(err) => {
                            tracing::warn!(
                                worker = name,
                                error = %err,
                                "failed to open registry session, retrying next interval"
                            );
                            continue;
                        }
                    }
                }
            };

            match worker.run_once(&client).await {
                Ok(()) => session = Some(client),
                Err(err) => {
                    tracing::warn!(
                        worker = name,
                        error = %err,
                        "background pass failed, reopening session next interval"
                    );
                    release(name, &client, registry_timeout).await;
                }
            }
        }

        if let Some(client) = session {
            release(name, &client, registry_timeout).await;
        }
        tracing::info!(worker = name, "background worker stopped");
    });

    WorkerHandle {
        name,
        shutdown,
        task,
    }
}

async fn release<C: RegistryClient>(name: &'static str, client: &C, limit: Duration) {
    if let Err(err) = bounded("registry logoff", limit, client.logoff()).await {
        tracing::warn!(worker = name, error = %err, "failed to release registry session");
    }
}
