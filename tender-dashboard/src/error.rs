use thiserror::Error;

/// Failures surfaced by the dashboard's data layer.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure reaching the gateway.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the gateway, carrying its message.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Caller input defect caught before anything goes on the wire.
    #[error("{0}")]
    Validation(String),

    /// The gateway answered but the payload didn't have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(message.into())
    }

    /// Whether the retry wrapper should spend budget on this error.
    ///
    /// Transport failures and 5xx responses (503 while the gateway is
    /// mid-reconnect, 500 on an execution error) are worth retrying; a 4xx
    /// or a local validation defect will fail identically every time, so it
    /// surfaces immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            ClientError::Validation(_) | ClientError::Decode(_) => false,
        }
    }
}
