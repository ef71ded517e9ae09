//! Command dispatcher — executes one command end-to-end.
//!
//! alias → device record → protocol key → driver → device write.
//!
//! A registry session is opened per dispatch and released on every exit path
//! once it has been opened, whichever step fails. Dropping the dispatch future
//! midway still releases it.

use std::sync::Arc;
use std::time::Duration;

use localgw_domain::command::{CommandRequest, DispatchOutcome, DispatchResult};
use localgw_domain::device::DeviceTarget;

use crate::drivers::DriverRegistry;
use crate::ports::{RegistryClient, RegistryConnector};
use crate::services::alias_resolver::AliasResolver;
use crate::services::attribute_key_resolver::AttributeKeyResolver;
use crate::timeout::{Timeouts, bounded};

/// Orchestrates the resolvers and the driver registry.
pub struct CommandDispatcher<R> {
    registry: R,
    drivers: DriverRegistry,
    aliases: AliasResolver,
    attributes: AttributeKeyResolver,
    timeouts: Timeouts,
}

impl<R: RegistryConnector> CommandDispatcher<R> {
    /// Create a dispatcher over `registry` and the given drivers.
    pub fn new(registry: R, drivers: DriverRegistry, timeouts: Timeouts) -> Self {
        Self {
            registry,
            drivers,
            aliases: AliasResolver::new(timeouts.registry),
            attributes: AttributeKeyResolver::new(timeouts.registry),
            timeouts,
        }
    }

    /// Execute `command`.
    ///
    /// A device whose vendor/class has no registered driver is not an error:
    /// the command is dropped with a warning and
    /// [`DispatchOutcome::Unsupported`] is returned.
    ///
    /// # Errors
    ///
    /// Lookup errors when the alias, routed device or attribute key is
    /// unknown; internal errors for registry, device, timeout or validation
    /// failures. Failures are logged here before being returned.
    #[tracing::instrument(
        skip(self, command),
        fields(alias = %command.alias, attribute = %command.attribute)
    )]
    pub async fn dispatch(&self, command: &CommandRequest) -> DispatchResult {
        let result = self.run(command).await;
        match &result {
            Ok(DispatchOutcome::Applied {
                device_id,
                protocol_key,
                value,
            }) => {
                tracing::info!(%device_id, %protocol_key, value, "command applied");
            }
            Ok(DispatchOutcome::Unsupported { .. }) => {}
            Err(err) => {
                tracing::error!(
                    kind = err.kind().as_str(),
                    error = %err,
                    "command dispatch failed"
                );
            }
        }
        result
    }

    async fn run(&self, command: &CommandRequest) -> DispatchResult {
        let client = bounded(
            "registry connect",
            self.timeouts.registry,
            self.registry.connect(),
        )
        .await?;
        let session = SessionGuard::new(client, self.timeouts.registry);

        let result = self.execute(session.client(), command).await;

        session.release().await;
        result
    }

    async fn execute(&self, client: &R::Client, command: &CommandRequest) -> DispatchResult {
        let device = self.aliases.resolve(client, &command.alias).await?;
        let protocol_key = self
            .attributes
            .resolve(client, &command.attribute, &device.class_id)
            .await?;

        let Some(driver) = self.drivers.lookup(&device.vendor_id, &device.class_id) else {
            tracing::warn!(
                device_id = %device.id,
                vendor_id = %device.vendor_id,
                class_id = %device.class_id,
                "no driver registered for device, command not sent"
            );
            return Ok(DispatchOutcome::Unsupported {
                device_id: device.id,
                vendor_id: device.vendor_id,
                class_id: device.class_id,
            });
        };

        let target = DeviceTarget::try_from(&device)?;
        let value = command.normalized_value();
        bounded(
            "device write",
            self.timeouts.device,
            driver.set_attribute(&target, &protocol_key, value),
        )
        .await?;

        Ok(DispatchOutcome::Applied {
            device_id: device.id,
            protocol_key,
            value,
        })
    }
}

/// Open registry session that is logged off exactly once.
///
/// [`SessionGuard::release`] logs off inline. A guard dropped before that,
/// because the dispatch future was cancelled, hands the logoff to a spawned
/// task instead.
struct SessionGuard<C: RegistryClient + 'static> {
    client: Arc<C>,
    limit: Duration,
    released: bool,
}

impl<C: RegistryClient + 'static> SessionGuard<C> {
    fn new(client: C, limit: Duration) -> Self {
        Self {
            client: Arc::new(client),
            limit,
            released: false,
        }
    }

    fn client(&self) -> &C {
        &self.client
    }

    async fn release(mut self) {
        self.released = true;
        logoff::<C>(&self.client, self.limit).await;
    }
}

impl<C: RegistryClient + 'static> Drop for SessionGuard<C> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("registry session dropped outside the runtime, not released");
            return;
        };
        let client = Arc::clone(&self.client);
        let limit = self.limit;
        runtime.spawn(async move { logoff::<C>(&client, limit).await });
    }
}

async fn logoff<C: RegistryClient>(client: &C, limit: Duration) {
    if let Err(err) = bounded("registry logoff", limit, client.logoff()).await {
        tracing::warn!(error = %err, "failed to release registry session");
    }
}
