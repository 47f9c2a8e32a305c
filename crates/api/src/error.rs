use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use raxel_core::config::ConfigError;
use raxel_db::ConnectionError;
use serde_json::{json, Value};

use crate::response::ErrorResponse;
use crate::services::ServiceError;

/// Message returned for request bodies that fail parsing or validation.
pub const INVALID_BODY_MSG: &str = "Check data structure again.";

/// Message returned for request bodies over the size limit.
pub const PAYLOAD_TOO_LARGE_MSG: &str = "Request body too large.";

/// Message returned in place of internal error details.
const INTERNAL_MSG: &str = "An internal error occurred";

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] so every failure leaves the server as the
/// `{status, msg, error}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A configuration domain a handler depends on is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request body parsed but failed its validation rules.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The request body could not be read or parsed.
    #[error("Invalid body: {0}")]
    InvalidBody(String),

    /// The request body is larger than the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// An external service (token, email) failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The token guard rejected the request.
    #[error(transparent)]
    Guard(#[from] GuardRejection),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Reasons the bearer-token guard refuses a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardRejection {
    /// No `Authorization` header, or not a `Bearer` one.
    #[error("Token not found or invalid")]
    MissingToken,

    /// `Bearer` with nothing after it.
    #[error("There isn't a token to validate")]
    EmptyToken,

    /// The token did not verify.
    #[error("Access denied")]
    AccessDenied(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg, error) = match self {
            AppError::Config(err) => {
                tracing::error!(source = "AppError", error = %err, "Configuration error");
                internal()
            }

            // --- Request body ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                INVALID_BODY_MSG.to_string(),
                serde_json::to_value(&errors).unwrap_or(Value::Null),
            ),
            AppError::InvalidBody(reason) => (
                StatusCode::BAD_REQUEST,
                INVALID_BODY_MSG.to_string(),
                Value::String(reason),
            ),
            AppError::PayloadTooLarge(reason) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                PAYLOAD_TOO_LARGE_MSG.to_string(),
                Value::String(reason),
            ),

            // --- Services ---
            AppError::Service(err) => {
                tracing::error!(source = %err.origin, error = %err, "Service error");
                let status = err.status;
                let msg = err.msg.clone();
                (status, msg, serde_json::to_value(&err).unwrap_or(Value::Null))
            }
            AppError::Guard(rejection) => {
                let status = match &rejection {
                    GuardRejection::MissingToken | GuardRejection::EmptyToken => {
                        StatusCode::NOT_FOUND
                    }
                    GuardRejection::AccessDenied(reason) => {
                        tracing::warn!(source = "Guard", reason = %reason, "Token rejected");
                        StatusCode::FORBIDDEN
                    }
                };
                (status, rejection.to_string(), Value::Null)
            }
        };

        ErrorResponse::new(status, msg, error).into_response()
    }
}

fn internal() -> (StatusCode, String, Value) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_MSG.to_string(),
        Value::Null,
    )
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Terminal failures of a startup attempt.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Configuration could not be loaded or is missing a required value.
    #[error("configuration failed: {0}")]
    Configuration(#[from] ConfigError),

    /// The primary datastore refused the connection.
    #[error("database connection failed: {0}")]
    Connection(#[from] ConnectionError),

    /// The listener could not bind to the configured address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// The server loop stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(std::io::Error),

    /// `run` was called on an orchestrator that already tried to start.
    #[error("startup was already attempted")]
    AlreadyAttempted,
}

impl StartupError {
    /// Structured form of the error for log records.
    pub fn details(&self) -> Value {
        match self {
            StartupError::Connection(err) => json!(err),
            other => json!({ "msg": other.to_string() }),
        }
    }
}
