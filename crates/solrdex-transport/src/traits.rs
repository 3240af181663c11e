//! Transport abstraction
//!
//! Mapping and search code only ever talks to a `dyn SearchTransport`, so an
//! engine other than Solr, or a mock, can be plugged in without touching them.

use crate::{ExtractRequest, RawResponse, SelectQuery, TransportResult, UpdateRequest};
use async_trait::async_trait;
use solrdex_common::CorrelationId;

/// Capabilities the mapping layer needs from a full-text search engine
///
/// Implementations do no retries of their own; each call is one round trip.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Send a file through server-side content extraction and index the result
    ///
    /// The file referenced by the request must exist for the whole call.
    async fn extract(
        &self,
        request: &ExtractRequest,
        correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse>;

    /// Execute a delete or maintenance command
    async fn update(
        &self,
        request: &UpdateRequest,
        correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse>;

    /// Run a query and return the untouched response body
    async fn select(
        &self,
        query: &SelectQuery,
        correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse>;

    /// Check that the engine and core answer
    async fn ping(&self) -> TransportResult<bool>;
}
