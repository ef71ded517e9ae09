//! Set-attribute command handler.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use localgw_app::ports::RegistryConnector;
use localgw_domain::command::CommandRequest;

use crate::error::CommandError;
use crate::state::AppState;

/// Path segments of `/{external_device_id}/{attribute}/{value}`.
///
/// `external_device_id` is the caller-facing alias resolved through the
/// routing table.
#[derive(Debug, Deserialize)]
pub struct CommandPath {
    pub external_device_id: String,
    pub attribute: String,
    pub value: String,
}

impl From<CommandPath> for CommandRequest {
    fn from(path: CommandPath) -> Self {
        CommandRequest::new(path.external_device_id, path.attribute, path.value)
    }
}

/// Possible responses from the command endpoint.
pub enum CommandResponse {
    Ok,
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok => "OK".into_response(),
        }
    }
}

/// `GET|POST /{external_device_id}/{attribute}/{value}`
///
/// A device without a matching driver still answers `200 OK`.
pub async fn set_attribute<R>(
    State(state): State<AppState<R>>,
    Path(path): Path<CommandPath>,
) -> Result<CommandResponse, CommandError>
where
    R: RegistryConnector + 'static,
{
    let command = CommandRequest::from(path);
    state.dispatcher.dispatch(&command).await?;
    Ok(CommandResponse::Ok)
}
