//! Error taxonomy for client operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Shown when the backend cannot be reached at all.
pub const CONNECTION_NOTICE: &str = "Error de conexión con el servidor";

/// Errors raised by remote access, validation and local lookups.
///
/// Every variant ends up as a transient notification; none is fatal.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status. `message` is the backend's `error` field if it sent one.
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// Body could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// A required form field is missing or malformed. No request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// A named category/state or a challenge id is unknown.
    #[error("not found: {0}")]
    Lookup(String),

    /// Config file unreadable or invalid.
    #[error("config error: {0}")]
    Config(String),
}

impl ClientError {
    /// User-facing text for the notification overlay.
    ///
    /// `fallback` is the action-specific message used when the error itself
    /// carries nothing better (e.g. "Error al obtener retos").
    pub fn notice(&self, fallback: &str) -> String {
        match self {
            ClientError::Network(_) => CONNECTION_NOTICE.to_string(),
            ClientError::Status { message: Some(m), .. } if !m.trim().is_empty() => m.clone(),
            ClientError::Status { .. } | ClientError::Decode(_) => fallback.to_string(),
            ClientError::Validation(m) | ClientError::Lookup(m) | ClientError::Config(m) => m.clone(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
