use std::fmt;

use super::{numeric_var, string_var, ConfigDomain, ConfigError, EnvSource};

/// Default PostgreSQL port.
pub const DEFAULT_DB_PORT: u16 = 5432;
/// Default connection pool size.
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Connection settings for one database.
#[derive(Clone)]
pub struct DbSettings {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Database name; also used as the connection's display name.
    pub database: Option<String>,
    pub pool_size: u32,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_DB_PORT,
            username: None,
            password: None,
            database: None,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

impl DbSettings {
    /// Read the settings for the database whose variables start with `prefix`
    /// (e.g. `MAIN_DB` reads `MAIN_DB_HOST`, `MAIN_DB_PORT`, ...).
    fn from_env_prefixed(env: &dyn EnvSource, prefix: &str) -> Self {
        Self {
            host: string_var(env, &format!("{prefix}_HOST")),
            port: numeric_var(env, &format!("{prefix}_PORT"), DEFAULT_DB_PORT),
            username: string_var(env, &format!("{prefix}_USER")),
            password: string_var(env, &format!("{prefix}_PASSWORD")),
            database: string_var(env, &format!("{prefix}_NAME")),
            pool_size: numeric_var(env, &format!("{prefix}_POOL_SIZE"), DEFAULT_POOL_SIZE),
        }
    }

    fn require(value: Option<&str>, field: &'static str) -> Result<(), ConfigError> {
        match value {
            Some(v) if !v.is_empty() => Ok(()),
            _ => Err(ConfigError::MissingField {
                domain: DatabaseConfig::NAME,
                field,
            }),
        }
    }
}

/// Database configuration domain.
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// The primary datastore (`MAIN_DB_*`).
    pub main: DbSettings,
}

impl ConfigDomain for DatabaseConfig {
    const NAME: &'static str = "Databases Configurations";

    /// | Env Var             | Default |
    /// |---------------------|---------|
    /// | `MAIN_DB_HOST`      | unset   |
    /// | `MAIN_DB_PORT`      | `5432`  |
    /// | `MAIN_DB_USER`      | unset   |
    /// | `MAIN_DB_PASSWORD`  | unset   |
    /// | `MAIN_DB_NAME`      | unset   |
    /// | `MAIN_DB_POOL_SIZE` | `5`     |
    fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            main: DbSettings::from_env_prefixed(env, "MAIN_DB"),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        DbSettings::require(self.main.host.as_deref(), "MAIN_DB_HOST")?;
        DbSettings::require(self.main.username.as_deref(), "MAIN_DB_USER")?;
        DbSettings::require(self.main.database.as_deref(), "MAIN_DB_NAME")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pool_size_defaults_to_five() {
        for raw in ["", "five", "0", "-3", "2.5"] {
            let env: HashMap<&'static str, &'static str> =
                [("MAIN_DB_POOL_SIZE", raw)].into_iter().collect();
            assert_eq!(
                DatabaseConfig::from_env(&env).main.pool_size,
                DEFAULT_POOL_SIZE,
                "'{raw}' should fall back to the default pool size"
            );
        }
    }

    #[test]
    fn reads_main_database_variables() {
        let env: HashMap<&'static str, &'static str> = [
            ("MAIN_DB_HOST", "db.internal"),
            ("MAIN_DB_PORT", "6543"),
            ("MAIN_DB_USER", "app"),
            ("MAIN_DB_PASSWORD", "pw"),
            ("MAIN_DB_NAME", "orders"),
            ("MAIN_DB_POOL_SIZE", "12"),
        ]
        .into_iter()
        .collect();

        let config = DatabaseConfig::from_env(&env);
        assert_eq!(config.main.host.as_deref(), Some("db.internal"));
        assert_eq!(config.main.port, 6543);
        assert_eq!(config.main.username.as_deref(), Some("app"));
        assert_eq!(config.main.database.as_deref(), Some("orders"));
        assert_eq!(config.main.pool_size, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let env: HashMap<&'static str, &'static str> =
            [("MAIN_DB_HOST", "localhost")].into_iter().collect();
        let config = DatabaseConfig::from_env(&env);

        assert_matches!(
            config.validate(),
            Err(ConfigError::MissingField {
                field: "MAIN_DB_USER",
                ..
            })
        );
    }
}
