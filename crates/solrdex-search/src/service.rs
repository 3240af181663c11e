//! Search service implementation

use crate::error::Result;
use crate::{QueryBuilder, ResultParser};
use async_trait::async_trait;
use solrdex_common::CorrelationId;
use solrdex_document::{DocumentAccess, IndexDocument, SearchRequest, SearchResult};
use solrdex_transport::SearchTransport;
use std::sync::Arc;

/// Trait for search operations with correlation ID support
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Run `request` on behalf of the viewer in `access`
    async fn search(
        &self,
        request: &SearchRequest,
        access: &DocumentAccess,
        correlation_id: &CorrelationId,
    ) -> Result<SearchResult>;

    /// Stored fields of one indexed document, `None` when it is not indexed
    async fn get_document(
        &self,
        provider_id: &str,
        document_id: &str,
        correlation_id: &CorrelationId,
    ) -> Result<Option<IndexDocument>>;
}

/// Search service backed by a [`SearchTransport`]
#[derive(Clone)]
pub struct Search {
    transport: Arc<dyn SearchTransport>,
}

impl Search {
    pub const fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl SearchService for Search {
    #[tracing::instrument(skip(self, request, access), fields(correlation_id = %correlation_id, page = request.page, size = request.size))]
    async fn search(
        &self,
        request: &SearchRequest,
        access: &DocumentAccess,
        correlation_id: &CorrelationId,
    ) -> Result<SearchResult> {
        let query = QueryBuilder::build(request);
        let response = self.transport.select(&query, correlation_id).await?;

        let viewer_id = access.viewer_id.as_deref().unwrap_or(access.owner_id.as_str());
        let result = ResultParser::parse(&response.body, viewer_id)?;

        tracing::debug!(
            total = result.total,
            returned = result.documents.len(),
            time_ms = result.time,
            "Search completed"
        );
        Ok(result)
    }

    #[tracing::instrument(skip(self), fields(correlation_id = %correlation_id))]
    async fn get_document(
        &self,
        provider_id: &str,
        document_id: &str,
        correlation_id: &CorrelationId,
    ) -> Result<Option<IndexDocument>> {
        let query = QueryBuilder::document(provider_id, document_id)?;
        let response = self.transport.select(&query, correlation_id).await?;
        ResultParser::parse_stored(&response.body)
    }
}
