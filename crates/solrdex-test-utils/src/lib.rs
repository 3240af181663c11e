//! Shared fixtures for solrdex tests
//!
//! Provides ready-made documents and a builder for select responses as the
//! engine returns them, so mapping and search tests across crates agree on
//! what "a typical document" and "a typical answer" look like.
//!
//! ## Usage
//!
//! In your test crate's `Cargo.toml`:
//! ```toml
//! [dev-dependencies]
//! solrdex-test-utils = { path = "../solrdex-test-utils" }
//! ```
//!
//! In your tests:
//! ```
//! use solrdex_test_utils::{SelectResponseBuilder, sample_document};
//!
//! let document = sample_document();
//! let body = SelectResponseBuilder::new()
//!     .hit("files!42", 0.5, Some("report.txt"))
//!     .build();
//! assert!(body.contains("files!42"));
//! assert_eq!(document.provider_id, "files");
//! ```

use serde_json::{Map, Value, json};
use solrdex_document::{ContentEncoding, DocumentAccess, IndexDocument};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider id used by fixtures
pub const SAMPLE_PROVIDER: &str = "files";

/// Counter for unique document ids across all test crates
static DOCUMENT_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Next unique document id, e.g. `doc-7`
///
/// # Example
/// ```
/// use solrdex_test_utils::next_document_id;
///
/// assert_ne!(next_document_id(), next_document_id());
/// ```
pub fn next_document_id() -> String {
    let n = DOCUMENT_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("doc-{n}")
}

/// Access context owned by `alice`, shared with `bob` and the `staff` group
pub fn sample_access() -> DocumentAccess {
    DocumentAccess::new("alice")
        .with_user("bob")
        .with_group("staff")
}

/// Indexable plain-text document of the filesystem provider
pub fn sample_document() -> IndexDocument {
    IndexDocument::new(SAMPLE_PROVIDER, next_document_id())
        .with_title("report.txt")
        .with_content("quarterly numbers", ContentEncoding::Plain)
        .with_access(sample_access())
}

/// Builds select-handler JSON bodies
#[derive(Debug, Clone, Default)]
pub struct SelectResponseBuilder {
    qtime: Option<u64>,
    max_score: Option<f64>,
    docs: Vec<Value>,
    highlighting: Map<String, Value>,
}

impl SelectResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `responseHeader.QTime`; omitted from the body otherwise
    #[must_use]
    pub const fn with_qtime(mut self, qtime: u64) -> Self {
        self.qtime = Some(qtime);
        self
    }

    /// Set `response.maxScore`; omitted from the body otherwise
    #[must_use]
    pub const fn with_max_score(mut self, max_score: f64) -> Self {
        self.max_score = Some(max_score);
        self
    }

    /// Add a hit whose title is stored multi-valued (the usual shape)
    #[must_use]
    pub fn hit(mut self, id: &str, score: f64, title: Option<&str>) -> Self {
        let mut doc = json!({ "id": id, "score": score });
        if let (Some(title), Some(fields)) = (title, doc.as_object_mut()) {
            fields.insert("title".to_string(), json!([title]));
        }
        self.docs.push(doc);
        self
    }

    /// Add a hit whose title is stored as a single string
    #[must_use]
    pub fn hit_with_scalar_title(mut self, id: &str, score: f64, title: &str) -> Self {
        self.docs
            .push(json!({ "id": id, "score": score, "title": title }));
        self
    }

    /// Highlighted fragments of the text field for `id`
    #[must_use]
    pub fn highlight(mut self, id: &str, fragments: &[&str]) -> Self {
        self.highlighting
            .insert(id.to_string(), json!({ "text": fragments }));
        self
    }

    /// Render the response body
    pub fn build(&self) -> String {
        let mut header = json!({ "status": 0 });
        if let (Some(qtime), Some(fields)) = (self.qtime, header.as_object_mut()) {
            fields.insert("QTime".to_string(), json!(qtime));
        }

        let mut response = json!({
            "numFound": self.docs.len(),
            "start": 0,
            "docs": self.docs,
        });
        if let (Some(max_score), Some(fields)) = (self.max_score, response.as_object_mut()) {
            fields.insert("maxScore".to_string(), json!(max_score));
        }

        let mut body = json!({ "responseHeader": header, "response": response });
        if !self.highlighting.is_empty()
            && let Some(fields) = body.as_object_mut()
        {
            fields.insert(
                "highlighting".to_string(),
                Value::Object(self.highlighting.clone()),
            );
        }
        body.to_string()
    }
}
