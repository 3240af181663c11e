//! Mock implementation of `SearchTransport` for testing
//!
//! Records every request in memory and answers with canned responses, so
//! mapping and search logic can be tested without a running Solr.

use crate::{
    ExtractRequest, RawResponse, SearchTransport, SelectQuery, TransportError, TransportResult,
    UpdateRequest,
};
use async_trait::async_trait;
use solrdex_common::CorrelationId;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const OK_BODY: &str = r#"{"responseHeader":{"status":0,"QTime":1}}"#;
const EMPTY_SELECT_BODY: &str =
    r#"{"responseHeader":{"status":0,"QTime":0},"response":{"numFound":0,"start":0,"docs":[]}}"#;

/// An extract call as seen by the mock, including what the file held at that moment
#[derive(Debug, Clone)]
pub struct RecordedExtract {
    pub request: ExtractRequest,
    pub correlation_id: CorrelationId,
    /// File contents at call time; `None` when the file did not exist
    pub file_content: Option<Vec<u8>>,
}

#[derive(Default)]
struct Recorded {
    extracts: Vec<RecordedExtract>,
    updates: Vec<UpdateRequest>,
    selects: Vec<SelectQuery>,
    pings: usize,
}

type Failure = Option<(u16, String)>;

/// Mock transport for testing
#[derive(Clone)]
pub struct MockTransport {
    recorded: Arc<Mutex<Recorded>>,
    extract_failure: Failure,
    update_failure: Failure,
    select_failure: Failure,
    select_body: String,
    ping_ok: bool,
}

impl MockTransport {
    /// Create a mock that accepts everything and finds nothing
    pub fn new() -> Self {
        Self {
            recorded: Arc::new(Mutex::new(Recorded::default())),
            extract_failure: None,
            update_failure: None,
            select_failure: None,
            select_body: EMPTY_SELECT_BODY.to_string(),
            ping_ok: true,
        }
    }

    /// Configure extract calls to fail with the given HTTP status and body
    #[must_use]
    pub fn with_extract_failure(mut self, code: u16, body: impl Into<String>) -> Self {
        self.extract_failure = Some((code, body.into()));
        self
    }

    /// Configure update calls to fail with the given HTTP status and body
    #[must_use]
    pub fn with_update_failure(mut self, code: u16, body: impl Into<String>) -> Self {
        self.update_failure = Some((code, body.into()));
        self
    }

    /// Configure select calls to fail with the given HTTP status and body
    #[must_use]
    pub fn with_select_failure(mut self, code: u16, body: impl Into<String>) -> Self {
        self.select_failure = Some((code, body.into()));
        self
    }

    /// Body returned by successful select calls
    #[must_use]
    pub fn with_select_response(mut self, body: impl Into<String>) -> Self {
        self.select_body = body.into();
        self
    }

    /// Make ping report an unhealthy core
    #[must_use]
    pub const fn with_ping_down(mut self) -> Self {
        self.ping_ok = false;
        self
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Extract calls received so far (for test assertions)
    pub fn extracts(&self) -> Vec<RecordedExtract> {
        self.recorded().extracts.clone()
    }

    /// Update calls received so far (for test assertions)
    pub fn updates(&self) -> Vec<UpdateRequest> {
        self.recorded().updates.clone()
    }

    /// Select calls received so far (for test assertions)
    pub fn selects(&self) -> Vec<SelectQuery> {
        self.recorded().selects.clone()
    }

    /// Number of ping calls
    pub fn ping_count(&self) -> usize {
        self.recorded().pings
    }

    /// Total number of engine round trips
    pub fn call_count(&self) -> usize {
        let recorded = self.recorded();
        recorded
            .extracts
            .len()
            .saturating_add(recorded.updates.len())
            .saturating_add(recorded.selects.len())
            .saturating_add(recorded.pings)
    }

    fn answer(failure: &Failure, body: &str) -> TransportResult<RawResponse> {
        match failure {
            Some((code, body)) => Err(TransportError::Http {
                code: *code,
                body: body.clone(),
            }),
            None => Ok(RawResponse::new(200, body)),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot(path: &Path) -> Option<Vec<u8>> {
    std::fs::read(path).ok()
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn extract(
        &self,
        request: &ExtractRequest,
        correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse> {
        let file_content = snapshot(&request.file);
        let file_missing = file_content.is_none();

        self.recorded().extracts.push(RecordedExtract {
            request: request.clone(),
            correlation_id: correlation_id.clone(),
            file_content,
        });

        if file_missing {
            return Err(TransportError::Io {
                path: request.file.display().to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        Self::answer(&self.extract_failure, OK_BODY)
    }

    async fn update(
        &self,
        request: &UpdateRequest,
        _correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse> {
        self.recorded().updates.push(request.clone());
        Self::answer(&self.update_failure, OK_BODY)
    }

    async fn select(
        &self,
        query: &SelectQuery,
        correlation_id: &CorrelationId,
    ) -> TransportResult<RawResponse> {
        tracing::debug!(
            correlation_id = %correlation_id,
            query = %query.query,
            "Mock select operation"
        );
        self.recorded().selects.push(query.clone());
        Self::answer(&self.select_failure, &self.select_body)
    }

    async fn ping(&self) -> TransportResult<bool> {
        let mut recorded = self.recorded();
        recorded.pings = recorded.pings.saturating_add(1);
        Ok(self.ping_ok)
    }
}
