//! Select query construction

use solrdex_document::{
    DocumentResult, FIELD_ID, FIELD_SCORE, FIELD_TEXT, FIELD_TITLE, SearchRequest,
    is_free_attribute_key, namespaced_field, namespaced_wildcard, try_encode_identifier,
};
use solrdex_transport::{Highlight, SelectQuery, escape_phrase, escape_query_term};

/// Builds select queries for search requests
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    /// Fields returned for every hit
    fn result_fields() -> Vec<String> {
        vec![
            FIELD_ID.to_string(),
            namespaced_wildcard(),
            FIELD_TITLE.to_string(),
            FIELD_SCORE.to_string(),
        ]
    }

    /// Select query for one page of `request`
    ///
    /// Pages are 1-based; page 0 is read as page 1. Subtags whose key is
    /// reserved or not a field name are dropped from the filters.
    pub fn build(request: &SearchRequest) -> SelectQuery {
        let size = u64::from(request.size);
        let start = u64::from(request.page.saturating_sub(1)).saturating_mul(size);

        let mut filters = Vec::new();
        if !request.tags.is_empty() {
            let tags: Vec<String> = request
                .tags
                .iter()
                .map(|tag| escape_query_term(tag))
                .collect();
            filters.push(format!("{}:({})", namespaced_field("tags"), tags.join(" ")));
        }
        for (key, values) in &request.sub_tags {
            if !is_free_attribute_key(key) {
                tracing::warn!(key = %key, "Ignoring subtag filter with unusable key");
                continue;
            }
            if let Some(first) = values.first() {
                filters.push(format!(
                    "{}:\"{}\"",
                    namespaced_field(key),
                    escape_phrase(first)
                ));
            }
        }

        SelectQuery {
            query: request.query.clone(),
            default_field: Some(FIELD_TEXT.to_string()),
            fields: Self::result_fields(),
            start,
            rows: size,
            highlight: Some(Highlight {
                fields: vec![FIELD_TEXT.to_string()],
                pre: String::new(),
                post: String::new(),
            }),
            filters,
        }
    }

    /// Select query fetching the stored fields of one document
    ///
    /// # Errors
    /// Returns `MalformedIdentifier` when the provider id contains the id tie
    pub fn document(provider_id: &str, document_id: &str) -> DocumentResult<SelectQuery> {
        let id = try_encode_identifier(provider_id, document_id)?;
        Ok(SelectQuery {
            query: format!("{FIELD_ID}:\"{}\"", escape_phrase(&id)),
            default_field: None,
            fields: vec![
                FIELD_ID.to_string(),
                FIELD_TITLE.to_string(),
                namespaced_wildcard(),
            ],
            start: 0,
            rows: 1,
            highlight: None,
            filters: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_offsets() {
        let query = QueryBuilder::build(&SearchRequest::new("x").with_page(3).with_size(10));
        assert_eq!((query.start, query.rows), (20, 10));

        let query = QueryBuilder::build(&SearchRequest::new("x").with_page(1).with_size(20));
        assert_eq!((query.start, query.rows), (0, 20));
    }

    #[test]
    fn test_page_zero_starts_at_beginning() {
        let query = QueryBuilder::build(&SearchRequest::new("x").with_page(0));
        assert_eq!(query.start, 0);
    }

    #[test]
    fn test_query_shape() {
        let query = QueryBuilder::build(&SearchRequest::new("budget 2024"));

        assert_eq!(query.query, "budget 2024");
        assert_eq!(query.default_field.as_deref(), Some("text"));
        assert_eq!(query.fields, ["id", "attr_*", "title", "score"]);
        let highlight = query.highlight.unwrap_or_else(|| panic!("highlighting expected"));
        assert_eq!(highlight.fields, ["text"]);
        assert!(highlight.pre.is_empty() && highlight.post.is_empty());
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_tags_become_one_or_filter() {
        let request = SearchRequest::new("x").with_tag("finance").with_tag("q3");
        assert_eq!(QueryBuilder::build(&request).filters, ["attr_tags:(finance q3)"]);
    }

    #[test]
    fn test_tag_tokens_are_escaped() {
        let request = SearchRequest::new("x")
            .with_tag("project:x")
            .with_tag("c++)");
        assert_eq!(
            QueryBuilder::build(&request).filters,
            ["attr_tags:(c\\+\\+\\) project\\:x)"]
        );
    }

    #[test]
    fn test_sub_tag_with_reserved_key_is_ignored() {
        let request = SearchRequest::new("x")
            .with_sub_tag("owner", "mallory")
            .with_sub_tag("a b", "x")
            .with_sub_tag("author", "alice");
        assert_eq!(
            QueryBuilder::build(&request).filters,
            ["attr_author:\"alice\""]
        );
    }

    #[test]
    fn test_sub_tags_filter_on_first_value() {
        let request = SearchRequest::new("x")
            .with_sub_tag("author", "alice")
            .with_sub_tag("author", "bob")
            .with_sub_tag("label", "say \"hi\"");

        assert_eq!(
            QueryBuilder::build(&request).filters,
            ["attr_author:\"alice\"", "attr_label:\"say \\\"hi\\\"\""]
        );
    }

    #[test]
    fn test_sub_tag_without_values_is_ignored() {
        let mut request = SearchRequest::new("x");
        request.sub_tags.insert("author".to_string(), Vec::new());
        assert!(QueryBuilder::build(&request).filters.is_empty());
    }

    #[test]
    fn test_document_query() {
        let query = QueryBuilder::document("files", "42").unwrap_or_default();
        assert_eq!(query.query, "id:\"files!42\"");
        assert_eq!(query.rows, 1);

        assert!(QueryBuilder::document("a!b", "42").is_err());
    }
}
