//! Error types for document identity handling

use thiserror::Error;

/// Result type alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Errors raised by the identifier codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Identifier has no tie character, or a provider id would make it ambiguous
    #[error("Malformed document identifier '{identifier}': {reason}")]
    MalformedIdentifier { identifier: String, reason: String },
}

impl DocumentError {
    pub(crate) fn malformed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}
