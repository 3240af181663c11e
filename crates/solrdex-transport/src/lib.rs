//! Search engine transport for solrdex
//!
//! This crate defines the capability the mapping layer needs from a search
//! engine (extract, update, select, ping), the request values passed through
//! it, a Solr HTTP implementation and an in-memory mock for tests.

pub mod error;
pub mod mock;
pub mod request;
pub mod solr;
pub mod traits;

// Re-export main types
pub use error::{TransportError, TransportResult};
pub use mock::{MockTransport, RecordedExtract};
pub use request::{
    CommitPolicy, ExtractRequest, Highlight, RawResponse, SelectQuery, UpdateCommand,
    UpdateRequest, escape_phrase, escape_query_term,
};
pub use solr::SolrClient;
pub use traits::SearchTransport;
