//! Request handlers.

#[allow(clippy::missing_errors_doc)]
pub mod command;
