use std::sync::Arc;

use raxel_core::config::WebServiceConfig;
use raxel_db::DatabaseConnection;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Loaded web-service configuration.
    pub config: Arc<WebServiceConfig>,
    /// The primary datastore, connected before the first request is served.
    pub database: Arc<dyn DatabaseConnection>,
}
