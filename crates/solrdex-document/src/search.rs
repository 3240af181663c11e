//! Search request and result types

use crate::IndexDocument;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

const DEFAULT_PAGE_SIZE: u32 = 10;

/// A free-text query with pagination and tag filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Passed to the engine verbatim
    pub query: String,
    /// 1-based page number
    pub page: u32,
    pub size: u32,
    /// Any of these tags must match
    pub tags: BTreeSet<String>,
    /// Only the first value of each key is used as a filter
    pub sub_tags: BTreeMap<String, Vec<String>>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            tags: BTreeSet::new(),
            sub_tags: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    #[must_use]
    pub const fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    #[must_use]
    pub fn with_sub_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.sub_tags.entry(key.into()).or_default().push(value.into());
        self
    }
}

/// Normalized answer to a [`SearchRequest`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub total: u64,
    /// Best score in percent
    pub max_score: i64,
    /// Engine-side elapsed time in milliseconds
    pub time: u64,
    pub timed_out: bool,
    /// Untouched engine response body
    pub raw_response: String,
    pub documents: Vec<IndexDocument>,
}
