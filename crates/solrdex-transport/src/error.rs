//! Error types for search engine transport

use thiserror::Error;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur while talking to the search engine
#[derive(Error, Debug)]
pub enum TransportError {
    /// The engine answered with a non-success status
    #[error("Search engine returned HTTP {code}: {body}")]
    Http { code: u16, body: String },

    /// The engine could not be reached or the exchange broke off
    #[error("Search engine unavailable: {0}")]
    Connection(String),

    /// A local file referenced by a request could not be read
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Client could not be built from configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl TransportError {
    /// HTTP status code returned by the engine, if any
    pub const fn code(&self) -> Option<u16> {
        match self {
            Self::Http { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Raw response body returned by the engine, if any
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True when the engine reported that the target does not exist
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { code: 404, .. })
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<solrdex_config::ConfigError> for TransportError {
    fn from(err: solrdex_config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
