use thiserror::Error;

use civicsecure_shared::FieldErrors;
use civicsecure_store::StoreError;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Field-scoped form errors, shown inline.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The API answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never got a response.
    #[error("Network error - please check your connection: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Local storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        ClientError::Validation(errors)
    }
}

impl ClientError {
    /// HTTP status of an API error, `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
