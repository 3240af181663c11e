//! Request and response values exchanged with the engine

use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;

const RESPONSE_WRITER: &str = "json";

/// Characters with a meaning in the standard query parser
const QUERY_SPECIAL_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// Escape a single term so the query parser reads it literally
///
/// Whitespace is escaped too, so apply it to each token on its own and join
/// the results when the spaces between tokens must keep their OR meaning.
pub fn escape_query_term(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if QUERY_SPECIAL_CHARS.contains(&c) || c.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape a value for use inside a double-quoted phrase
pub fn escape_phrase(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// When written documents become visible to searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Hard commit as part of the request
    Immediate,
    /// Let the engine commit within the given window
    Within { millis: u64 },
}

impl CommitPolicy {
    /// Policy for a configured delay: `<= 0` commits immediately
    pub fn from_delay_seconds(seconds: i64) -> Self {
        match u64::try_from(seconds) {
            Ok(secs) if secs > 0 => Self::Within {
                millis: secs.saturating_mul(1000),
            },
            _ => Self::Immediate,
        }
    }

    fn param(self) -> (String, String) {
        match self {
            Self::Immediate => ("commit".to_string(), "true".to_string()),
            Self::Within { millis } => ("commitWithin".to_string(), millis.to_string()),
        }
    }
}

/// A file to run through the engine's content extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractRequest {
    /// Local file whose bytes are uploaded
    pub file: PathBuf,
    /// Name hint for content-type detection
    pub resource_name: Option<String>,
    /// Literal field values stored with the extracted document
    pub fields: BTreeMap<String, Vec<String>>,
    /// Renames of extracted fields, e.g. `content -> text`
    pub field_mappings: BTreeMap<String, String>,
    /// Prefix applied to extracted fields the schema does not know
    pub unknown_field_prefix: Option<String>,
    pub commit: CommitPolicy,
}

impl ExtractRequest {
    pub fn new(file: impl Into<PathBuf>, commit: CommitPolicy) -> Self {
        Self {
            file: file.into(),
            resource_name: None,
            fields: BTreeMap::new(),
            field_mappings: BTreeMap::new(),
            unknown_field_prefix: None,
            commit,
        }
    }

    /// Add one literal value to a field
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    /// Add every value to a field; empty iterators leave the field out
    pub fn add_field_values<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter().map(Into::<String>::into).peekable();
        if values.peek().is_some() {
            self.fields.entry(name.into()).or_default().extend(values);
        }
    }

    /// Values of a literal field
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map_or(&[], Vec::as_slice)
    }

    /// Query parameters understood by Solr's extracting request handler
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for (name, values) in &self.fields {
            for value in values {
                params.push((format!("literal.{name}"), value.clone()));
            }
        }
        for (from, to) in &self.field_mappings {
            params.push((format!("fmap.{from}"), to.clone()));
        }
        if let Some(prefix) = &self.unknown_field_prefix {
            params.push(("uprefix".to_string(), prefix.clone()));
        }
        if let Some(name) = &self.resource_name {
            params.push(("resource.name".to_string(), name.clone()));
        }
        params.push(self.commit.param());
        params.push(("omitHeader".to_string(), "false".to_string()));
        params.push(("wt".to_string(), RESPONSE_WRITER.to_string()));
        params
    }
}

/// Write commands that do not carry documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCommand {
    DeleteById(String),
    DeleteByQuery(String),
    Optimize,
}

/// An update-handler request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub command: UpdateCommand,
    pub commit: bool,
}

impl UpdateRequest {
    /// Delete one document and commit
    pub fn delete_by_id(id: impl Into<String>) -> Self {
        Self {
            command: UpdateCommand::DeleteById(id.into()),
            commit: true,
        }
    }

    /// Delete every document matching `query` and commit
    pub fn delete_by_query(query: impl Into<String>) -> Self {
        Self {
            command: UpdateCommand::DeleteByQuery(query.into()),
            commit: true,
        }
    }

    /// Merge index segments
    pub const fn optimize() -> Self {
        Self {
            command: UpdateCommand::Optimize,
            commit: false,
        }
    }

    /// JSON command body for the update handler
    pub fn body(&self) -> serde_json::Value {
        match &self.command {
            UpdateCommand::DeleteById(id) => json!({ "delete": { "id": id } }),
            UpdateCommand::DeleteByQuery(query) => json!({ "delete": { "query": query } }),
            UpdateCommand::Optimize => json!({ "optimize": {} }),
        }
    }

    /// Query parameters for the update handler
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("wt".to_string(), RESPONSE_WRITER.to_string())];
        if self.commit {
            params.push(("commit".to_string(), "true".to_string()));
        }
        params
    }
}

/// Highlighting settings of a select query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub fields: Vec<String>,
    pub pre: String,
    pub post: String,
}

/// A select (search) query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectQuery {
    pub query: String,
    pub default_field: Option<String>,
    pub fields: Vec<String>,
    pub start: u64,
    pub rows: u64,
    pub highlight: Option<Highlight>,
    /// Filter queries; all must match
    pub filters: Vec<String>,
}

impl SelectQuery {
    /// Query parameters for the select handler
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("q".to_string(), self.query.clone())];
        if let Some(df) = &self.default_field {
            params.push(("df".to_string(), df.clone()));
        }
        if !self.fields.is_empty() {
            params.push(("fl".to_string(), self.fields.join(",")));
        }
        params.push(("start".to_string(), self.start.to_string()));
        params.push(("rows".to_string(), self.rows.to_string()));
        if let Some(highlight) = &self.highlight {
            params.push(("hl".to_string(), "true".to_string()));
            params.push(("hl.fl".to_string(), highlight.fields.join(",")));
            params.push(("hl.simple.pre".to_string(), highlight.pre.clone()));
            params.push(("hl.simple.post".to_string(), highlight.post.clone()));
        }
        for filter in &self.filters {
            params.push(("fq".to_string(), filter.clone()));
        }
        params.push(("wt".to_string(), RESPONSE_WRITER.to_string()));
        params
    }
}

/// Untouched engine response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Stand-in for operations whose response carries nothing of interest
    pub const fn empty() -> Self {
        Self {
            status: 200,
            body: String::new(),
        }
    }

    /// Body parsed as JSON; an empty body yields an empty object
    ///
    /// # Errors
    /// Returns `TransportError::Serialization` when the body is not JSON
    pub fn json(&self) -> crate::TransportResult<serde_json::Value> {
        if self.body.trim().is_empty() {
            return Ok(json!({}));
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}
