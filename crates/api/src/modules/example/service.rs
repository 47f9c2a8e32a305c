use crate::error::AppResult;
use crate::response::ApiResponse;

use super::validator::SendMessage;

/// Business logic behind the example endpoints.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleService;

impl ExampleService {
    pub fn new() -> Self {
        Self
    }

    pub async fn get_message(&self) -> AppResult<ApiResponse<SendMessage>> {
        Ok(ApiResponse::created(
            "This is a message from the server",
            SendMessage {
                title: "Hello".into(),
                msg: "Hello, from ExampleService".into(),
                signature: None,
            },
        ))
    }

    /// Echo the accepted message back.
    pub async fn send_message(&self, data: SendMessage) -> AppResult<ApiResponse<SendMessage>> {
        tracing::debug!(source = "ExampleService", title = %data.title, "Message received");
        Ok(ApiResponse::created("Message sent.", data))
    }
}
