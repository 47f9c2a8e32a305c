//! Cross-cutting services used by controllers.
//!
//! - [`jwt::JwtService`] -- token signing and verification.
//! - [`email::EmailService`] -- SMTP dispatch.
//! - [`encryption`] -- UUIDs and Argon2id hashes.
//!
//! Failures against a live provider are reported as [`ServiceError`], which
//! the HTTP boundary renders with its `{source, msg, details}` shape intact.

use axum::http::StatusCode;
use serde::Serialize;

pub mod email;
pub mod encryption;
pub mod jwt;

/// A runtime failure of an external service.
#[derive(Debug, Clone, Serialize, thiserror::Error)]
#[error("{origin}: {msg}")]
pub struct ServiceError {
    /// HTTP status the failure maps to.
    #[serde(skip)]
    pub status: StatusCode,
    /// The service that failed, e.g. `EmailService`.
    #[serde(rename = "source")]
    pub origin: String,
    pub msg: String,
    pub details: Option<String>,
}

impl ServiceError {
    pub fn new(status: StatusCode, origin: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            origin: origin.into(),
            msg: msg.into(),
            details: None,
        }
    }

    /// A 500 failure.
    pub fn internal(origin: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, origin, msg)
    }

    pub fn with_details(mut self, details: impl ToString) -> Self {
        self.details = Some(details.to_string());
        self
    }
}
