//! Solrdex search crate
//!
//! Translates provider-agnostic search requests into select queries and
//! normalizes the engine's answers back into documents.

pub mod error;
pub mod parser;
pub mod query;
pub mod service;

// Re-export main types
pub use error::SearchError;
pub use parser::{ResultParser, UNKNOWN_TITLE, UNKNOWN_VALUE};
pub use query::QueryBuilder;
pub use service::{Search, SearchService};
