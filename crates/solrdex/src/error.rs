use solrdex_config::ConfigError;
use solrdex_indexing::IndexerError;
use solrdex_search::SearchError;
use solrdex_transport::TransportError;
use thiserror::Error;

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors surfaced by the platform facade
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Configuration invalid: {0}")]
    ConfigurationInvalid(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Indexing error: {0}")]
    Indexing(#[from] IndexerError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),
}
