//! JSON body extraction with declarative validation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// Like [`Json`], but runs the payload's [`Validate`] rules after parsing.
///
/// Malformed JSON and rule violations both become a 400 envelope with the
/// message `Check data structure again.`; only the `error` details differ.
/// A body over the configured limit becomes a 413 envelope.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<SendMessage>) -> AppResult<..> { .. }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
                _ => AppError::InvalidBody(rejection.body_text()),
            })?;

        value.validate()?;
        Ok(Self(value))
    }
}
