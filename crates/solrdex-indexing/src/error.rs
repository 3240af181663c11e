//! Error types for the indexing pipeline

use solrdex_document::DocumentError;
use solrdex_transport::TransportError;
use thiserror::Error;

/// Result type alias for indexing operations
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Why a document could not be written to the index
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Containers (directories) have no content of their own
    #[error("Document '{id}' is a container and cannot be indexed")]
    NotIndexableDocument { id: String },

    /// Only some providers deliver content the extractor can read
    #[error("Provider '{provider_id}' is not compatible with content extraction")]
    ProviderNotCompatible { provider_id: String },

    /// The engine rejected the extraction request
    #[error("Error extracting {title}")]
    DataExtractionFailed {
        title: String,
        /// HTTP status returned by the engine, when it answered at all
        code: Option<u16>,
        #[source]
        source: TransportError,
    },

    /// Indexing requires to know who may see the document
    #[error("Document '{id}' has no access context")]
    AccessContextMissing { id: String },

    /// A subtag key would shadow a reserved attribute or is not a field name
    #[error("Document '{id}' has an unusable subtag key '{key}'")]
    InvalidSubTag { id: String, key: String },

    /// Encoded content could not be decoded
    #[error("Content of document '{id}' could not be decoded: {message}")]
    ContentDecoding { id: String, message: String },

    /// Staging the content on disk failed
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error(transparent)]
    MalformedIdentifier(#[from] DocumentError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl IndexerError {
    /// Stable category name recorded with per-document errors
    pub const fn category(&self) -> &'static str {
        match self {
            Self::NotIndexableDocument { .. } => "NotIndexableDocument",
            Self::ProviderNotCompatible { .. } => "ProviderNotCompatible",
            Self::DataExtractionFailed { .. } => "DataExtractionFailed",
            Self::AccessContextMissing { .. } => "AccessContextMissing",
            Self::InvalidSubTag { .. } => "InvalidSubTag",
            Self::ContentDecoding { .. } => "ContentDecoding",
            Self::Io { .. } => "Io",
            Self::MalformedIdentifier(_) => "MalformedIdentifier",
            Self::Transport(_) => "Transport",
        }
    }

    /// Response body of the engine, when the failure came from one
    pub fn engine_body(&self) -> Option<&str> {
        match self {
            Self::DataExtractionFailed { source, .. } | Self::Transport(source) => source.body(),
            _ => None,
        }
    }

    /// Human-readable reason, preferring the engine's own explanation
    ///
    /// Understands the `error.root_cause[0].reason` and `error.reason`
    /// shapes as well as Solr's `error.msg`.
    pub fn reason(&self) -> String {
        self.engine_body()
            .and_then(parse_engine_reason)
            .unwrap_or_else(|| self.to_string())
    }

    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }
}

fn parse_engine_reason(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["/error/root_cause/0/reason", "/error/reason", "/error/msg"]
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(serde_json::Value::as_str))
        .map(ToString::to_string)
}
