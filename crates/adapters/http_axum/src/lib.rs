//! # localgw-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept `GET`/`POST /{external_device_id}/{attribute}/{value}` and turn it
//!   into a [`CommandRequest`](localgw_domain::command::CommandRequest)
//! - Hand the command to the
//!   [`CommandDispatcher`](localgw_app::services::command_dispatcher::CommandDispatcher)
//! - Map the dispatch result into a plain-text response:
//!   `200 OK`, `404` for lookup failures, `500` for everything else
//! - Serve `/health`
//!
//! ## Dependency rule
//! Depends on `localgw-app` (for the dispatcher and ports) and `localgw-domain`
//! (for request and error types). Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
