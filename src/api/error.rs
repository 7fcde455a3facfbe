use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No authentication token found. Please log in.")]
    MissingToken,

    #[error("Session expired or invalid. Please log in again.")]
    Unauthorized,

    #[error("Request failed with status {status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Missing or rejected credentials; the session has to be dropped.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::MissingToken | ApiError::Unauthorized)
    }

    /// Server-provided message when there is one, otherwise `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::Http { message, .. } | ApiError::Rejected(message) if !message.is_empty() => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

/// Errors cross the iced message boundary, which requires `Clone`.
/// `reqwest::Error` is not `Clone`, so tasks hand results over as this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Unauthorized,
    Message(String),
}

impl Failure {
    pub fn message(&self) -> String {
        match self {
            Failure::Unauthorized => ApiError::Unauthorized.to_string(),
            Failure::Message(m) => m.clone(),
        }
    }
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        if err.is_unauthorized() {
            Failure::Unauthorized
        } else {
            Failure::Message(err.to_string())
        }
    }
}

impl Failure {
    /// Like `From`, but keeps a screen-specific fallback text for errors
    /// that carry no server message.
    pub fn with_fallback(err: ApiError, fallback: &str) -> Self {
        if err.is_unauthorized() {
            Failure::Unauthorized
        } else {
            Failure::Message(err.message_or(fallback))
        }
    }
}
