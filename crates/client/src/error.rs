use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    /// Non-success response; `message` is the server's `error` field when it
    /// sent one.
    #[error("API error ({status}): {message:?}")]
    Api { status: u16, message: Option<String> },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// The server-supplied message, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
