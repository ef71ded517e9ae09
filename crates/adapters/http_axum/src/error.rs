//! HTTP error response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use localgw_domain::error::{ErrorKind, GatewayError};

/// Maps a failed dispatch to a plain-text response carrying the error detail.
///
/// The dispatcher has already logged the failure.
#[derive(Debug)]
pub struct CommandError(GatewayError);

impl From<GatewayError> for CommandError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl CommandError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::Lookup => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        (self.status(), self.0.to_string()).into_response()
    }
}
