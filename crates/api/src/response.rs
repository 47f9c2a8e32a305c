//! Response envelopes shared by every controller.
//!
//! Success: `{ "status": <u16>, "msg": "...", "data": ... }`
//! Failure: `{ "status": <u16>, "msg": "...", "error": ... }`
//!
//! The `status` field always equals the HTTP status of the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Serialize, Serializer};

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

/// Successful `{status, msg, data}` envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub msg: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, msg: impl Into<String>, data: T) -> Self {
        Self {
            status,
            msg: msg.into(),
            data,
        }
    }

    /// `200 OK` envelope.
    pub fn ok(msg: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, msg, data)
    }

    /// `201 Created` envelope.
    pub fn created(msg: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, msg, data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Failed `{status, msg, error}` envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub msg: String,
    pub error: serde_json::Value,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, msg: impl Into<String>, error: serde_json::Value) -> Self {
        Self {
            status,
            msg: msg.into(),
            error,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
