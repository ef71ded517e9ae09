//! Application services — use-case implementations.
//!
//! Each service accepts port trait implementations via generic parameters
//! (constructor or call-site injection), keeping this layer decoupled from
//! concrete adapters.

pub mod alias_resolver;
pub mod attribute_key_resolver;
pub mod command_dispatcher;

use serde::de::DeserializeOwned;

use localgw_domain::device::decode_record;
use localgw_domain::error::GatewayError;

use crate::ports::{Record, Table};

/// Decode the first row of a registry read, if any.
///
/// The registry is expected to enforce uniqueness; extra rows are ignored.
pub(crate) fn first_record<T: DeserializeOwned>(
    table: Table,
    rows: Option<Vec<Record>>,
) -> Result<Option<T>, GatewayError> {
    match rows.and_then(|rows| rows.into_iter().next()) {
        Some(record) => Ok(Some(decode_record(table.as_str(), record)?)),
        None => Ok(None),
    }
}
