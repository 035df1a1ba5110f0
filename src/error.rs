use thiserror::Error;

/// Errors produced while generating topics or touching local storage
#[derive(Debug, Error)]
pub enum TopicError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("API key is not configured")]
    MissingApiKey,

    #[error("A generation request is already in flight")]
    Busy,

    #[error("API request failed: {status}")]
    RequestFailed { status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Storage error for key '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TopicError {
    pub fn storage(key: &str, source: std::io::Error) -> Self {
        Self::Storage {
            key: key.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TopicError>;
