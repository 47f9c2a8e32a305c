use serde::Serialize;

/// A connect or disconnect failure.
///
/// Serialises as `{source, msg, details}` so it can be embedded verbatim in
/// an error response or log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{origin}: {msg}")]
pub struct ConnectionError {
    /// The connection that failed, e.g. `DB [Postgres] "main"`.
    #[serde(rename = "source")]
    pub origin: String,
    pub msg: String,
    /// Underlying driver error, when there is one.
    pub details: Option<String>,
}

impl ConnectionError {
    pub fn new(origin: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            msg: msg.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl ToString) -> Self {
        self.details = Some(details.to_string());
        self
    }
}
