use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /example/send-message`. Unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SendMessage {
    #[validate(length(min = 1, max = 50))]
    pub title: String,

    #[validate(length(min = 1))]
    pub msg: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub signature: Option<String>,
}
