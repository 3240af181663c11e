//! Select response normalization
//!
//! Only a handful of envelope fields are read; everything else in the body
//! is ignored but kept verbatim in [`SearchResult::raw_response`].

use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;
use solrdex_document::{
    DocumentAccess, FIELD_TEXT, IndexDocument, SearchResult, decode_identifier, namespaced_field,
};
use std::collections::{BTreeMap, HashMap};

/// Title given to hits stored without one
pub const UNKNOWN_TITLE: &str = "Unknown Document Title";

/// Hash and source of search hits; neither is stored in the index
pub const UNKNOWN_VALUE: &str = "Unknown";

const DEFAULT_QUERY_TIME: u64 = 1;

#[derive(Debug, Deserialize)]
struct SelectEnvelope {
    #[serde(rename = "responseHeader", default)]
    header: ResponseHeader,
    response: ResponseBody,
    #[serde(default)]
    highlighting: HashMap<String, HashMap<String, Vec<String>>>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseHeader {
    #[serde(rename = "QTime")]
    qtime: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(rename = "numFound")]
    num_found: u64,
    #[serde(rename = "maxScore")]
    max_score: Option<f64>,
    #[serde(default)]
    docs: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    id: String,
    score: Option<f64>,
    title: Option<OneOrMany>,
    #[serde(flatten)]
    stored: BTreeMap<String, Value>,
}

/// Multi-valued fields may come back as a single value
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn first(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value),
            Self::Many(values) => values.first().map(String::as_str),
        }
    }
}

/// Relevance as an integer percentage; fractions are truncated
#[allow(clippy::cast_possible_truncation)]
fn percent(score: f64) -> i64 {
    (score * 100.0).trunc() as i64
}

fn string_values(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(ToString::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Turns select responses into [`SearchResult`]s and documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultParser;

impl ResultParser {
    fn envelope(body: &str) -> Result<SelectEnvelope> {
        Ok(serde_json::from_str(body)?)
    }

    /// Normalize a search response for `viewer_id`
    ///
    /// # Errors
    /// - `MalformedResponse` when `body` is not a select response
    /// - `MalformedIdentifier` when a hit id is not a composite identifier
    pub fn parse(body: &str, viewer_id: &str) -> Result<SearchResult> {
        let mut envelope = Self::envelope(body)?;

        let mut documents = Vec::with_capacity(envelope.response.docs.len());
        for hit in &envelope.response.docs {
            let (provider_id, document_id) = decode_identifier(&hit.id)?;
            let excerpts = envelope
                .highlighting
                .get_mut(&hit.id)
                .and_then(|fields| fields.remove(FIELD_TEXT))
                .unwrap_or_default();

            let mut document = IndexDocument::new(provider_id, document_id)
                .with_title(hit.title.as_ref().and_then(OneOrMany::first).unwrap_or(UNKNOWN_TITLE))
                .with_access(DocumentAccess::for_viewer(viewer_id));
            document.hash = UNKNOWN_VALUE.to_string();
            document.source = UNKNOWN_VALUE.to_string();
            document.score = Some(percent(hit.score.unwrap_or_default()));
            document.excerpts = excerpts;
            documents.push(document);
        }

        Ok(SearchResult {
            total: envelope.response.num_found,
            max_score: envelope.response.max_score.map_or(0, percent),
            time: envelope.header.qtime.unwrap_or(DEFAULT_QUERY_TIME),
            timed_out: false,
            raw_response: body.to_string(),
            documents,
        })
    }

    /// Rebuild the stored document of a by-id lookup
    ///
    /// Returns `None` when the response holds no hit.
    ///
    /// # Errors
    /// - `MalformedResponse` when `body` is not a select response
    /// - `MalformedIdentifier` when the hit id is not a composite identifier
    pub fn parse_stored(body: &str) -> Result<Option<IndexDocument>> {
        let envelope = Self::envelope(body)?;
        let Some(hit) = envelope.response.docs.first() else {
            return Ok(None);
        };

        let (provider_id, document_id) = decode_identifier(&hit.id)?;
        let field = |name: &str| string_values(hit.stored.get(&namespaced_field(name)));

        let mut access = DocumentAccess::new(field("owner").into_iter().next().unwrap_or_default());
        access.users.extend(field("users"));
        access.groups.extend(field("groups"));
        access.circles.extend(field("circles"));
        access.links.extend(field("links"));

        let mut document = IndexDocument::new(provider_id, document_id)
            .with_title(hit.title.as_ref().and_then(OneOrMany::first).unwrap_or_default())
            .with_access(access);
        document.tags.extend(field("tags"));
        document.meta_tags.extend(field("metatags"));
        document.hash = UNKNOWN_VALUE.to_string();
        document.source = UNKNOWN_VALUE.to_string();

        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SearchError;

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent(0.957), 95);
        assert_eq!(percent(1.2), 120);
        assert_eq!(percent(0.0), 0);
    }

    #[test]
    fn test_title_accepts_scalar_and_array() {
        let body = r#"{"response":{"numFound":2,"docs":[
            {"id":"files!1","score":1.0,"title":["a.txt","ignored"]},
            {"id":"files!2","score":1.0,"title":"b.txt"}
        ]}}"#;
        let result = ResultParser::parse(body, "alice").unwrap_or_default();
        let titles: Vec<&str> = result.documents.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, ["a.txt", "b.txt"]);
    }

    #[test]
    fn test_missing_header_defaults_time() {
        let body = r#"{"response":{"numFound":0,"docs":[]}}"#;
        let result = ResultParser::parse(body, "alice").unwrap_or_default();
        assert_eq!(result.time, 1);
        assert_eq!(result.max_score, 0);
    }

    #[test]
    fn test_not_an_envelope() {
        assert!(matches!(
            ResultParser::parse("<html></html>", "alice"),
            Err(SearchError::MalformedResponse { .. })
        ));
        assert!(matches!(
            ResultParser::parse(r#"{"error":{"msg":"undefined field"}}"#, "alice"),
            Err(SearchError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_id_without_tie_is_malformed() {
        let body = r#"{"response":{"numFound":1,"docs":[{"id":"legacy-id","score":1.0}]}}"#;
        assert!(matches!(
            ResultParser::parse(body, "alice"),
            Err(SearchError::MalformedIdentifier(_))
        ));
    }

    #[test]
    fn test_stored_fields_are_restored() {
        let body = r#"{"response":{"numFound":1,"docs":[{
            "id":"files!42",
            "title":["report.txt"],
            "attr_owner":["alice"],
            "attr_users":["bob","carol"],
            "attr_groups":"staff",
            "attr_tags":["finance"],
            "attr_metatags":["shared"]
        }]}}"#;

        let document = ResultParser::parse_stored(body)
            .unwrap_or_default()
            .unwrap_or_default();

        assert_eq!(document.provider_id, "files");
        assert_eq!(document.id, "42");
        assert_eq!(document.title, "report.txt");
        let access = document.access.unwrap_or_default();
        assert_eq!(access.owner_id, "alice");
        assert_eq!(access.users.len(), 2);
        assert!(access.groups.contains("staff"));
        assert!(document.tags.contains("finance"));
        assert!(document.meta_tags.contains("shared"));
    }

    #[test]
    fn test_stored_lookup_without_hit() {
        let body = r#"{"response":{"numFound":0,"docs":[]}}"#;
        assert!(matches!(ResultParser::parse_stored(body), Ok(None)));
    }
}
