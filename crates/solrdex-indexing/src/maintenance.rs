//! Whole-index operations

use crate::IndexerResult;
use solrdex_common::CorrelationId;
use solrdex_document::{DOCUMENT_ID_TIE, FIELD_ID};
use solrdex_transport::{
    RawResponse, SearchTransport, TransportResult, UpdateRequest, escape_query_term,
};
use std::sync::Arc;

/// Provider selector meaning "every provider"
pub const ALL_PROVIDERS: &str = "all";

const MATCH_ALL: &str = "*:*";

/// Reset, optimize and health checks against the whole index
#[derive(Clone)]
pub struct IndexMaintenance {
    transport: Arc<dyn SearchTransport>,
}

impl IndexMaintenance {
    pub const fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self { transport }
    }

    /// Query matching every document of `provider_id`, or everything for [`ALL_PROVIDERS`]
    pub fn reset_query(provider_id: &str) -> String {
        if provider_id == ALL_PROVIDERS {
            return MATCH_ALL.to_string();
        }
        format!(
            "{FIELD_ID}:{}\\{DOCUMENT_ID_TIE}*",
            escape_query_term(provider_id)
        )
    }

    /// Drop all documents of one provider, or of every provider
    ///
    /// # Errors
    /// Returns `Transport` when the engine rejects the delete
    #[tracing::instrument(skip(self))]
    pub async fn reset_index(&self, provider_id: &str) -> IndexerResult<RawResponse> {
        let correlation_id = CorrelationId::new();
        let query = Self::reset_query(provider_id);
        tracing::warn!(correlation_id = %correlation_id, query = %query, "Resetting index");

        Ok(self
            .transport
            .update(&UpdateRequest::delete_by_query(query), &correlation_id)
            .await?)
    }

    /// Merge index segments
    ///
    /// # Errors
    /// Returns `Transport` when the engine rejects the command
    #[tracing::instrument(skip(self))]
    pub async fn optimize(&self) -> IndexerResult<RawResponse> {
        let correlation_id = CorrelationId::new();
        tracing::info!(correlation_id = %correlation_id, "Optimizing index");

        Ok(self
            .transport
            .update(&UpdateRequest::optimize(), &correlation_id)
            .await?)
    }

    /// Whether the engine answers and reports itself healthy
    ///
    /// # Errors
    /// Returns the transport error when the engine cannot be reached
    pub async fn ping(&self) -> TransportResult<bool> {
        self.transport.ping().await
    }
}
