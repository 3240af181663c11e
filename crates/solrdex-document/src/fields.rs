//! Engine field naming
//!
//! Domain attributes (tags, subtags, access lists...) are stored under
//! dynamic fields sharing one prefix. The same prefix is handed to the
//! extract handler for metadata it does not know, so nothing extracted from
//! a file can collide with the reserved fields below.

/// Prefix of every namespaced field
pub const NAMESPACE_PREFIX: &str = "attr_";

/// Unique key field
pub const FIELD_ID: &str = "id";

/// Stored title field
pub const FIELD_TITLE: &str = "title";

/// Pseudo-field carrying the relevance score
pub const FIELD_SCORE: &str = "score";

/// Field receiving extracted content; default search and highlight field
pub const FIELD_TEXT: &str = "text";

/// Attribute names the index itself writes; free-form keys may not reuse them
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "tags", "metatags", "provider", "owner", "users", "groups", "circles", "links",
];

/// Whether `key` may name a caller-supplied attribute such as a subtag
///
/// Keys must be non-empty, made of ASCII letters, digits and `_`, and must
/// not shadow one of [`RESERVED_ATTRIBUTES`].
pub fn is_free_attribute_key(key: &str) -> bool {
    !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED_ATTRIBUTES.contains(&key)
}

/// Engine field name for a domain attribute
pub fn namespaced_field(name: &str) -> String {
    format!("{NAMESPACE_PREFIX}{name}")
}

/// Field-list pattern matching every namespaced field
pub fn namespaced_wildcard() -> String {
    namespaced_field("*")
}
