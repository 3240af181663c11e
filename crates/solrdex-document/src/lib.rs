//! Provider-agnostic document model for solrdex
//!
//! Everything the mapping layer exchanges with its callers lives here: the
//! indexable document and its access context, index status bookkeeping,
//! search requests and results, plus the two pure codecs that define the
//! engine-side naming scheme (composite identifiers and namespaced fields).

pub mod document;
pub mod error;
pub mod fields;
pub mod identifier;
pub mod search;
pub mod status;

pub use document::{
    ContentEncoding, DocumentAccess, DocumentKind, IndexDocument, resolve_local_path,
};
pub use error::{DocumentError, DocumentResult};
pub use fields::{
    FIELD_ID, FIELD_SCORE, FIELD_TEXT, FIELD_TITLE, NAMESPACE_PREFIX, RESERVED_ATTRIBUTES,
    is_free_attribute_key, namespaced_field, namespaced_wildcard,
};
pub use identifier::{DOCUMENT_ID_TIE, decode_identifier, encode_identifier, try_encode_identifier};
pub use search::{SearchRequest, SearchResult};
pub use status::{IndexErrorRecord, IndexState, IndexStatus, Severity};
