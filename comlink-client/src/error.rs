//! Error types for the comlink client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },

    // Data format errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid ally code: {0}")]
    InvalidAllyCode(String),

    // Configuration errors
    #[error("Missing credential component: {field}")]
    MissingCredential { field: &'static str },

    #[error("Request signing failed: {reason}")]
    Signing { reason: String },

    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper methods for common error construction
impl Error {
    /// Create a server error from a status code and response body
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            status,
            body: body.into(),
        }
    }

    /// Create a missing credential error
    pub fn missing_credential(field: &'static str) -> Self {
        Self::MissingCredential { field }
    }

    /// Create a signing error
    pub fn signing(reason: impl Into<String>) -> Self {
        Self::Signing {
            reason: reason.into(),
        }
    }

    /// Create an invalid ally code error
    pub fn invalid_ally_code(allycode: impl Into<String>) -> Self {
        Self::InvalidAllyCode(allycode.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
