//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`GatewayError`]
//! via `From`. Callers classify failures with [`GatewayError::kind`] rather
//! than by matching on concrete adapter errors.

use std::time::Duration;

/// Boxed source error coming from an adapter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for every gateway operation.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A registry lookup found nothing for the requested key.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A registry record is present but unusable.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The device registry failed (transport, query, session).
    #[error("registry error: {0}")]
    Registry(#[source] BoxError),

    /// The physical device could not be reached or refused the command.
    #[error("device error: {0}")]
    Device(#[source] BoxError),

    /// A bounded call did not complete in time.
    #[error("{operation} timed out after {}ms", limit.as_millis())]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },
}

impl GatewayError {
    /// Classify this error for the caller.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lookup(_) => ErrorKind::Lookup,
            Self::Validation(_) | Self::Registry(_) | Self::Device(_) | Self::Timeout { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Wrap an adapter error as a registry failure.
    pub fn registry(err: impl Into<BoxError>) -> Self {
        Self::Registry(err.into())
    }

    /// Wrap an adapter error as a device failure.
    pub fn device(err: impl Into<BoxError>) -> Self {
        Self::Device(err.into())
    }
}

/// Coarse classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller asked for something the registry does not know.
    Lookup,
    /// Anything else: transport, timeout, malformed registry data.
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Internal => "internal",
        }
    }
}

/// Failures of the resolution steps, one per registry table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("device routing not found: {alias}")]
    RoutingNotFound { alias: String },

    #[error("device not found: {external_device_id}")]
    DeviceNotFound { external_device_id: String },

    #[error("device attribute key not found: attribute:{attribute} class_id:{class_id}")]
    AttributeKeyNotFound { attribute: String, class_id: String },
}

/// A registry record that cannot be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device {device_id} has an invalid protocol version {version:?}")]
    InvalidVersion { device_id: String, version: String },

    #[error("malformed {table} record: {reason}")]
    MalformedRecord { table: &'static str, reason: String },
}
