//! Two-phase startup: configure, then build and start the application.
//!
//! ```text
//! Unconfigured --configure--> Configured --start--> Running
//!       |                          |
//!       +--------> Failed <--------+
//! ```
//!
//! A configure-phase failure is terminal: the application is never built and
//! the database factory is never called.

use std::sync::Arc;

use raxel_core::config::{
    ConfigError, ConfigurationRegistry, DatabaseConfig, EnvSource, WebServiceConfig,
};
use raxel_db::DatabaseConnection;

pub use crate::error::StartupError;
use crate::routing::RouteTable;
use crate::server::{RunningServer, Server};

const SOURCE: &str = "Bootstrap";

/// Builds the primary datastore from the loaded database configuration.
pub type DatabaseFactory =
    Box<dyn FnOnce(&DatabaseConfig) -> Arc<dyn DatabaseConnection> + Send + 'static>;

/// Where a startup attempt is. Private to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartupState {
    Unconfigured,
    Configured,
    Running,
    Failed,
}

/// The startup orchestrator.
///
/// Owns the configuration registry, the route table and the database
/// factory, and tracks where its single startup attempt is. A second call to
/// [`run`](Self::run) is refused.
pub struct Bootstrap {
    registry: ConfigurationRegistry,
    routes: Option<RouteTable>,
    database: Option<DatabaseFactory>,
    state: StartupState,
}

impl Bootstrap {
    pub fn new<F>(registry: ConfigurationRegistry, routes: RouteTable, database: F) -> Self
    where
        F: FnOnce(&DatabaseConfig) -> Arc<dyn DatabaseConnection> + Send + 'static,
    {
        Self {
            registry,
            routes: Some(routes),
            database: Some(Box::new(database)),
            state: StartupState::Unconfigured,
        }
    }

    /// Load configuration from `env`, then start the server.
    pub async fn run(&mut self, env: &dyn EnvSource) -> Result<RunningServer, StartupError> {
        let (Some(routes), Some(database), StartupState::Unconfigured) =
            (self.routes.take(), self.database.take(), self.state)
        else {
            tracing::warn!(source = SOURCE, state = ?self.state, "Startup was already attempted.");
            return Err(StartupError::AlreadyAttempted);
        };

        tracing::info!(
            source = SOURCE,
            version = env!("CARGO_PKG_VERSION"),
            "Raxel's Backend Structure is starting"
        );

        // --- Phase 1: configure ---
        tracing::debug!(source = SOURCE, "Loading configurations...");
        let (web_service, databases) = match configure(&mut self.registry, env) {
            Ok(configs) => configs,
            Err(err) => {
                tracing::error!(
                    source = SOURCE,
                    error = %err,
                    "There's an error loading the configurations."
                );
                self.advance(StartupState::Failed);
                return Err(err.into());
            }
        };
        tracing::info!(
            source = SOURCE,
            service = %web_service.name,
            environment = %web_service.environment,
            "Configurations are set."
        );
        self.advance(StartupState::Configured);

        // --- Phase 2: build and start ---
        tracing::debug!(source = SOURCE, "Starting the application (Web Service).");
        let connection = database(&databases);

        match Server::new(web_service, connection, routes).start().await {
            Ok(running) => {
                self.advance(StartupState::Running);
                Ok(running)
            }
            Err(err) => {
                tracing::error!(
                    source = SOURCE,
                    error = %err,
                    details = %err.details(),
                    "There's an error building the application."
                );
                self.advance(StartupState::Failed);
                Err(err)
            }
        }
    }

    fn advance(&mut self, next: StartupState) {
        tracing::debug!(source = SOURCE, from = ?self.state, to = ?next, "Startup state changed");
        self.state = next;
    }
}

fn configure(
    registry: &mut ConfigurationRegistry,
    env: &dyn EnvSource,
) -> Result<(WebServiceConfig, DatabaseConfig), ConfigError> {
    registry.load_all(env);
    registry.validate()?;

    Ok((
        registry.web_service().get()?.clone(),
        registry.databases().get()?.clone(),
    ))
}
