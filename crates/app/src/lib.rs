//! # localgw-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RegistryConnector` / `RegistryClient` — session-scoped reads over the
//!     routing, device and attribute-key tables
//!   - `DeviceConnector` / `DeviceSession` — open a session to a physical
//!     device and write one attribute
//!   - `DeviceDriver` — a vendor/class-specific control strategy
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AliasResolver`, `AttributeKeyResolver` — the two lookup steps
//!   - `CommandDispatcher` — one command end-to-end, with guaranteed session release
//! - Provide the **driver registry** and the supervised **background workers**
//!
//! ## Dependency rule
//! Depends on `localgw-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod drivers;
pub mod ports;
pub mod services;
pub mod timeout;
pub mod workers;

#[cfg(test)]
pub(crate) mod testing;
