//! # localgw-domain
//!
//! Pure domain model for the localgw device gateway.
//!
//! ## Responsibilities
//! - Define the **registry records** the gateway reads: routing entries,
//!   device records, attribute-key entries
//! - Define **validated connection parameters** ([`device::DeviceTarget`])
//!   and the numeric [`device::ProtocolVersion`]
//! - Define **commands** and their value normalization
//! - Define the **error taxonomy** shared by every layer, split into lookup
//!   errors (client-facing) and internal errors
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod command;
pub mod device;
pub mod error;
