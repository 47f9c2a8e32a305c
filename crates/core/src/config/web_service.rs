use std::fmt;

use super::{numeric_var, string_var, ConfigDomain, ConfigError, EnvSource};

/// Default service name when `WEB_SERVICE_NAME` is not set.
pub const DEFAULT_SERVICE_NAME: &str = "Raxel's Backend Structure";
/// Default environment label when `ENVIRONMENT` is not set.
pub const DEFAULT_ENVIRONMENT: &str = "DEVELOPMENT";
/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default maximum request body size in bytes (1 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// SMTP settings consumed by the email service.
///
/// All four values are required by the email service, but none of them are
/// checked at load time.
#[derive(Clone, Default)]
pub struct EmailSettings {
    /// Sender address (`EMAIL_PROVIDER_ADDRESS`).
    pub provider: Option<String>,
    /// Well-known service name or SMTP host (`EMAIL_SERVICE_NAME`).
    pub service: Option<String>,
    /// SMTP username (`EMAIL_SERVICE_USERNAME`).
    pub user: Option<String>,
    /// SMTP password (`EMAIL_SERVICE_PASSWORD`).
    pub pass: Option<String>,
}

impl fmt::Debug for EmailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettings")
            .field("provider", &self.provider)
            .field("service", &self.service)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Token-signing settings consumed by the JWT service.
#[derive(Clone, Default)]
pub struct JwtSettings {
    /// HMAC signing secret (`JWT_SECRET`).
    pub secret: Option<String>,
    /// Token lifetime (`JWT_EXPIRATION`): seconds or a duration like `1h`.
    pub expiration: Option<String>,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Web-service configuration domain.
#[derive(Debug, Clone)]
pub struct WebServiceConfig {
    pub name: String,
    /// Deployment label, e.g. `DEVELOPMENT` or `PRODUCTION`.
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
    pub email: EmailSettings,
    pub jwt: JwtSettings,
}

impl Default for WebServiceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_SERVICE_NAME.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            email: EmailSettings::default(),
            jwt: JwtSettings::default(),
        }
    }
}

impl ConfigDomain for WebServiceConfig {
    const NAME: &'static str = "Web Service Configurations";

    /// | Env Var                    | Default                      |
    /// |----------------------------|------------------------------|
    /// | `WEB_SERVICE_NAME`         | `Raxel's Backend Structure`  |
    /// | `ENVIRONMENT`              | `DEVELOPMENT`                |
    /// | `HOST`                     | `0.0.0.0`                    |
    /// | `PORT`                     | `3000`                       |
    /// | `REQUEST_BODY_LIMIT_BYTES` | `1048576`                    |
    /// | `EMAIL_*`, `JWT_*`         | unset                        |
    fn from_env(env: &dyn EnvSource) -> Self {
        Self {
            name: string_var(env, "WEB_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            environment: string_var(env, "ENVIRONMENT")
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            host: string_var(env, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: numeric_var(env, "PORT", DEFAULT_PORT),
            body_limit_bytes: numeric_var(
                env,
                "REQUEST_BODY_LIMIT_BYTES",
                DEFAULT_BODY_LIMIT_BYTES,
            ),
            email: EmailSettings {
                provider: string_var(env, "EMAIL_PROVIDER_ADDRESS"),
                service: string_var(env, "EMAIL_SERVICE_NAME"),
                user: string_var(env, "EMAIL_SERVICE_USERNAME"),
                pass: string_var(env, "EMAIL_SERVICE_PASSWORD"),
            },
            jwt: JwtSettings {
                secret: string_var(env, "JWT_SECRET"),
                expiration: string_var(env, "JWT_EXPIRATION"),
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                domain: Self::NAME,
                field: "WEB_SERVICE_NAME",
            });
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                domain: Self::NAME,
                field: "HOST",
            });
        }
        Ok(())
    }
}
