//! Per-document indexing dispatch
//!
//! Every document is handled in a single pass: it is either removed from or
//! (re)written to the index, its [`IndexState`](solrdex_document::IndexState)
//! is updated and the attached runner hears about the outcome. Failures are
//! recorded on the document rather than returned, so one bad document never
//! aborts a batch.

use crate::mapper::IndexMapper;
use crate::runner::{IndexRunner, ResultType};
use crate::{IndexerError, IndexerResult};
use chrono::Utc;
use solrdex_common::CorrelationId;
use solrdex_document::{IndexDocument, IndexStatus, Severity};
use solrdex_transport::RawResponse;
use std::sync::Arc;
use tracing::{info, warn};

const REMOVED_RESULT: &str = "{}";
const ACTION_INDEX: &str = "indexDocument";
const ACTION_REMOVE: &str = "removeDocument";

/// Routes documents to the remove or extract path and reports outcomes
#[derive(Clone)]
pub struct IndexRouter {
    mapper: IndexMapper,
    runner: Option<Arc<dyn IndexRunner>>,
}

impl IndexRouter {
    pub const fn new(mapper: IndexMapper) -> Self {
        Self {
            mapper,
            runner: None,
        }
    }

    /// Attach the host runner that receives per-document events
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn IndexRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Index, update or remove one document depending on its status
    ///
    /// Returns the document's resulting status, `DONE` or `FAILED`.
    #[tracing::instrument(skip(self, document), fields(provider = %document.provider_id, id = %document.id))]
    pub async fn index_document(&self, document: &mut IndexDocument) -> IndexStatus {
        let correlation_id = CorrelationId::new();
        let removing = document.index.status.contains(IndexStatus::REMOVE);

        if let Some(runner) = &self.runner {
            let action = if removing { ACTION_REMOVE } else { ACTION_INDEX };
            runner.update_action(action, false);
        }

        let outcome = if removing {
            self.mapper
                .index_document_remove(&document.provider_id, &document.id, &correlation_id)
                .await
                .map(|_| REMOVED_RESULT.to_string())
        } else {
            self.mapper
                .index_document_new(document, &correlation_id)
                .await
                .map(|response| result_message(&response))
        };

        match outcome {
            Ok(message) => self.on_success(document, &message, &correlation_id),
            Err(e) => self.on_failure(document, &e, &correlation_id),
        }

        document.index.status
    }

    /// Remove every `(provider, document)` pair from the index
    ///
    /// Returns the number of removed documents.
    ///
    /// # Errors
    /// Stops at the first pair that cannot be removed.
    pub async fn delete_indexes(&self, indexes: &[(&str, &str)]) -> IndexerResult<usize> {
        let correlation_id = CorrelationId::new();
        info!(
            correlation_id = %correlation_id,
            count = indexes.len(),
            "Removing documents from index"
        );

        let mut removed: usize = 0;
        for (provider_id, document_id) in indexes {
            self.mapper
                .index_document_remove(provider_id, document_id, &correlation_id)
                .await?;
            removed = removed.saturating_add(1);
        }
        Ok(removed)
    }

    fn on_success(
        &self,
        document: &mut IndexDocument,
        message: &str,
        correlation_id: &CorrelationId,
    ) {
        document.index.mark_done(Utc::now());
        info!(correlation_id = %correlation_id, "Document indexed");

        if let Some(runner) = &self.runner {
            runner.new_index_result(&document.index, message, "ok", ResultType::Success);
        }
    }

    fn on_failure(
        &self,
        document: &mut IndexDocument,
        error: &IndexerError,
        correlation_id: &CorrelationId,
    ) {
        let reason = error.reason();
        warn!(
            correlation_id = %correlation_id,
            category = error.category(),
            error = %error,
            "Document could not be indexed: {reason}"
        );

        if let Some(runner) = &self.runner {
            runner.new_index_result(
                &document.index,
                "",
                "issue while indexing",
                ResultType::Warning,
            );
        }

        document
            .index
            .add_error(reason.clone(), error.category(), Severity::Error);

        if let Some(runner) = &self.runner {
            runner.new_index_error(&document.index, &reason, error.category(), Severity::Error);
            runner.new_index_result(&document.index, "", "fail", ResultType::Fail);
        }

        document.index.mark_failed();
    }
}

/// Engine answer as handed to the runner: compact JSON when parseable
fn result_message(response: &RawResponse) -> String {
    response
        .json()
        .map_or_else(|_| response.body.clone(), |value| value.to_string())
}
