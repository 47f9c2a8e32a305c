//! Tests for `AppError` → HTTP response mapping.
//!
//! Each variant must leave the server as the `{status, msg, error}` envelope
//! with the right status code. No HTTP server is needed; the tests call
//! `IntoResponse` directly.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use raxel_api::error::{AppError, GuardRejection, INVALID_BODY_MSG, PAYLOAD_TOO_LARGE_MSG};
use raxel_api::services::ServiceError;
use raxel_core::config::ConfigError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Request errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_body_carries_the_parse_reason() {
    let err = AppError::InvalidBody("expected value at line 1 column 1".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["msg"], INVALID_BODY_MSG);
    assert_eq!(json["error"], "expected value at line 1 column 1");
}

#[tokio::test]
async fn oversized_body_returns_413_envelope() {
    let err = AppError::PayloadTooLarge("Failed to buffer the request body: length limit exceeded".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["status"], 413);
    assert_eq!(json["msg"], PAYLOAD_TOO_LARGE_MSG);
}

// ---------------------------------------------------------------------------
// Services and guards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_error_keeps_its_status_and_source() {
    let err = AppError::Service(
        ServiceError::new(StatusCode::BAD_GATEWAY, "EmailService", "There's an error sending the email")
            .with_details("relay refused"),
    );

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["status"], 502);
    assert_eq!(json["msg"], "There's an error sending the email");
    assert_eq!(json["error"]["source"], "EmailService");
    assert_eq!(json["error"]["details"], "relay refused");
}

#[tokio::test]
async fn guard_rejections_map_to_404_and_403() {
    let (status, json) = error_to_response(GuardRejection::MissingToken.into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["msg"], "Token not found or invalid");

    let (status, json) = error_to_response(GuardRejection::EmptyToken.into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["msg"], "There isn't a token to validate");

    let (status, json) =
        error_to_response(GuardRejection::AccessDenied("InvalidSignature".into()).into()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["msg"], "Access denied");
}

// ---------------------------------------------------------------------------
// Internal errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn config_error_is_a_500() {
    let err = AppError::Config(ConfigError::MissingField {
        domain: "Web Service Configurations",
        field: "JWT_SECRET",
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["status"], 500);
    assert_eq!(json["msg"], "An internal error occurred");
    assert!(
        !json.to_string().contains("JWT_SECRET"),
        "internal error details must not leak to the client"
    );
}
