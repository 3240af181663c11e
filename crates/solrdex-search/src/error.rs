use solrdex_document::DocumentError;
use solrdex_transport::TransportError;
use thiserror::Error;

/// Result type for search operations
///
/// Not named `SearchResult`: that name belongs to the normalized answer type.
pub type Result<T, E = SearchError> = std::result::Result<T, E>;

/// Search-specific error types
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Malformed search response: {message}")]
    MalformedResponse { message: String },

    #[error(transparent)]
    MalformedIdentifier(#[from] DocumentError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse {
            message: err.to_string(),
        }
    }
}
