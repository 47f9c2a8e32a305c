//! HS256 token generation and verification.
//!
//! Tokens carry an arbitrary JSON object payload plus `iat`, and `exp` when
//! an expiration is configured. The signing secret is validated when the
//! service is built, not when configuration loads.

use std::collections::HashSet;
use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use raxel_core::config::{ConfigDomain, ConfigError, JwtSettings, WebServiceConfig};
use serde::Serialize;
use serde_json::Value;

use super::ServiceError;

const SOURCE: &str = "JwtService";

/// Signs and verifies tokens with the configured secret.
#[derive(Clone)]
pub struct JwtService {
    secret: String,
    expiration: Option<Duration>,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl JwtService {
    /// Build the service from the `JWT_*` settings.
    ///
    /// | Env Var          | Required | Format                                |
    /// |------------------|----------|---------------------------------------|
    /// | `JWT_SECRET`     | **yes**  | any non-empty string                  |
    /// | `JWT_EXPIRATION` | no       | seconds (`3600`) or duration (`1h`)   |
    ///
    /// Without `JWT_EXPIRATION` tokens never expire.
    pub fn new(settings: &JwtSettings) -> Result<Self, ConfigError> {
        let secret = settings
            .secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingField {
                domain: WebServiceConfig::NAME,
                field: "JWT_SECRET",
            })?;

        let expiration = settings
            .expiration
            .as_deref()
            .map(parse_expiration)
            .transpose()?;

        Ok(Self { secret, expiration })
    }

    /// Sign `payload`, which must serialise to a JSON object.
    pub fn generate<T: Serialize>(&self, payload: &T) -> Result<String, ServiceError> {
        let mut claims = match serde_json::to_value(payload) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                return Err(ServiceError::internal(
                    SOURCE,
                    "The token payload must be an object",
                ))
            }
            Err(e) => {
                return Err(
                    ServiceError::internal(SOURCE, "The token payload is not serialisable")
                        .with_details(e),
                )
            }
        };

        let now = chrono::Utc::now().timestamp();
        claims.insert("iat".into(), now.into());
        if let Some(expiration) = self.expiration {
            let secs = i64::try_from(expiration.as_secs()).unwrap_or(i64::MAX);
            claims.insert("exp".into(), now.saturating_add(secs).into());
        }

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            ServiceError::internal(SOURCE, "There's an error signing the token").with_details(e)
        })
    }

    /// Verify `token` and return its payload.
    ///
    /// Surrounding whitespace is ignored. `exp` is enforced when present.
    pub fn verify(&self, token: &str) -> Result<Value, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();

        let data = decode::<Value>(
            token.trim(),
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}

fn parse_expiration(raw: &str) -> Result<Duration, ConfigError> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(raw).map_err(|e| ConfigError::InvalidValue {
        domain: WebServiceConfig::NAME,
        field: "JWT_EXPIRATION",
        reason: e.to_string(),
    })
}
