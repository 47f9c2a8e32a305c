use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::validation::ValidatedJson;

use super::service::ExampleService;
use super::validator::SendMessage;

/// `GET /example/get-message`
pub async fn get_message() -> AppResult<ApiResponse<SendMessage>> {
    ExampleService::new().get_message().await
}

/// `POST /example/send-message`
pub async fn send_message(
    ValidatedJson(input): ValidatedJson<SendMessage>,
) -> AppResult<ApiResponse<SendMessage>> {
    ExampleService::new().send_message(input).await
}
