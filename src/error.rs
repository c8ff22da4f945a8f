//! Error handling for the dispatch admin client

use std::fmt;
use thiserror::Error;

/// Unified error type for the dispatch admin client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The backend rejected the request, either with a non-2xx status or an
    /// explicit `status: false` / `success: false` body
    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The backend this client talks to does not provide the endpoint
    #[error("{0}")]
    NotImplemented(String),

    /// Rejected locally before any request was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Session storage I/O errors
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new API error
    pub fn api<T: fmt::Display>(status: Option<u16>, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new not-implemented error
    pub fn not_implemented<T: fmt::Display>(msg: T) -> Self {
        Error::NotImplemented(msg.to_string())
    }

    /// Create a new invalid input error
    pub fn invalid_input<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidInput(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// The message a caller should display for this error
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            Error::NotImplemented(msg) | Error::InvalidInput(msg) | Error::Auth(msg) => {
                msg.clone()
            }
            Error::Http(_) => "Network error. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
