//! Bounded calls — every registry and device call carries a deadline.

use std::future::Future;
use std::time::Duration;

use localgw_domain::error::GatewayError;

/// Deadlines applied to outbound calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Per registry call (connect, read, logoff).
    pub registry: Duration,
    /// Per driver invocation (session open plus the write).
    pub device: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            registry: Duration::from_secs(5),
            device: Duration::from_secs(5),
        }
    }
}

/// Await `future`, failing with [`GatewayError::Timeout`] after `limit`.
///
/// # Errors
///
/// Returns the future's own error, or a timeout naming `operation`.
pub async fn bounded<T, F>(
    operation: &'static str,
    limit: Duration,
    future: F,
) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| GatewayError::Timeout { operation, limit })?
}
