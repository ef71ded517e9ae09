//! Shared application state for axum handlers.

use std::sync::Arc;

use localgw_app::ports::RegistryConnector;
use localgw_app::services::command_dispatcher::CommandDispatcher;

/// Application state shared across all axum handlers.
///
/// Generic over the registry connector to avoid dynamic dispatch.
/// `Clone` is implemented manually so the connector itself does not need to
/// be `Clone` — only the `Arc` wrapper is cloned.
pub struct AppState<R> {
    pub dispatcher: Arc<CommandDispatcher<R>>,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<R> AppState<R>
where
    R: RegistryConnector + 'static,
{
    pub fn new(dispatcher: CommandDispatcher<R>) -> Self {
        Self::from_arc(Arc::new(dispatcher))
    }

    /// Use when the dispatcher is shared with other tasks.
    pub fn from_arc(dispatcher: Arc<CommandDispatcher<R>>) -> Self {
        Self { dispatcher }
    }
}
