use std::time::Duration;

use async_trait::async_trait;
use raxel_core::config::{DatabaseConfig, DbSettings};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tokio::sync::RwLock;

use crate::{ConnectionError, DatabaseConnection, DbPool};

/// How long `connect` waits for the first connection before giving up.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Name used when the settings carry no database name.
const FALLBACK_NAME: &str = "main";

/// A PostgreSQL connection pool opened on demand.
pub struct PostgresConnection {
    name: String,
    settings: DbSettings,
    connect_timeout: Duration,
    pool: RwLock<Option<DbPool>>,
}

impl PostgresConnection {
    pub fn new(name: impl Into<String>, settings: DbSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            pool: RwLock::new(None),
        }
    }

    /// The primary datastore described by `config.main`, named after its database.
    pub fn main(config: &DatabaseConfig) -> Self {
        let name = config
            .main
            .database
            .clone()
            .unwrap_or_else(|| FALLBACK_NAME.to_string());
        Self::new(name, config.main.clone())
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// A handle to the open pool, or `None` while disconnected.
    pub async fn pool(&self) -> Option<DbPool> {
        self.pool.read().await.clone()
    }

    fn label(&self) -> String {
        format!("DB [Postgres] \"{}\"", self.name)
    }

    fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new().port(self.settings.port);
        if let Some(host) = &self.settings.host {
            options = options.host(host);
        }
        if let Some(username) = &self.settings.username {
            options = options.username(username);
        }
        if let Some(password) = &self.settings.password {
            options = options.password(password);
        }
        if let Some(database) = &self.settings.database {
            options = options.database(database);
        }
        options
    }
}

#[async_trait]
impl DatabaseConnection for PostgresConnection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<(), ConnectionError> {
        let label = self.label();
        let mut slot = self.pool.write().await;
        if slot.is_some() {
            return Err(ConnectionError::new(label, "DB connection is already opened."));
        }

        tracing::debug!(source = %label, "Configuration set. Trying to connect...");

        let pool = PgPoolOptions::new()
            .max_connections(self.settings.pool_size)
            .acquire_timeout(self.connect_timeout)
            .connect_with(self.connect_options())
            .await
            .map_err(|e| {
                ConnectionError::new(label.clone(), "There's an error during database connection.")
                    .with_details(e)
            })?;

        *slot = Some(pool);
        tracing::info!(source = %label, "Connection established. Pool ready for use.");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ConnectionError> {
        let label = self.label();
        let Some(pool) = self.pool.write().await.take() else {
            tracing::warn!(source = %label, "DB connection is already disconnected.");
            return Err(ConnectionError::new(label, "DB connection is already closed."));
        };

        pool.close().await;
        tracing::info!(source = %label, "Connection closed.");
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.pool.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn unreachable_settings() -> DbSettings {
        DbSettings {
            host: Some("127.0.0.1".into()),
            // Port 1 is reserved and nothing listens on it in test environments.
            port: 1,
            username: Some("postgres".into()),
            password: None,
            database: Some("raxel_test".into()),
            pool_size: 1,
        }
    }

    #[test]
    fn main_connection_is_named_after_database() {
        let config = DatabaseConfig {
            main: unreachable_settings(),
        };
        assert_eq!(PostgresConnection::main(&config).name(), "raxel_test");

        let unnamed = DatabaseConfig::default();
        assert_eq!(PostgresConnection::main(&unnamed).name(), FALLBACK_NAME);
    }

    #[tokio::test]
    async fn disconnect_without_connect_fails() {
        let conn = PostgresConnection::new("main", unreachable_settings());

        let err = conn.disconnect().await.unwrap_err();
        assert_eq!(err.origin, "DB [Postgres] \"main\"");
        assert_eq!(err.msg, "DB connection is already closed.");
        assert!(!conn.is_connected().await);
    }

    #[tokio::test]
    async fn connect_to_unreachable_server_fails_with_details() {
        let conn = PostgresConnection::new("main", unreachable_settings())
            .with_connect_timeout(Duration::from_millis(500));

        let result = conn.connect().await;
        assert_matches!(&result, Err(err) if err.details.is_some());
        assert!(!conn.is_connected().await);
        assert!(conn.pool().await.is_none());
    }
}
