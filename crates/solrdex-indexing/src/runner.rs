//! Host runner callbacks
//!
//! The host orchestrating an indexing job wants to hear about every
//! document. The router reports through [`IndexRunner`] and never decides
//! whether the job as a whole succeeded.

use solrdex_document::{IndexState, Severity};
use std::sync::{Mutex, PoisonError};

/// Outcome class of one indexed document; values are the host's result-type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    Success = 1,
    Warning = 4,
    Fail = 9,
}

/// Callback sink for per-document indexing events
pub trait IndexRunner: Send + Sync {
    /// The runner's current action changed
    ///
    /// The router reports `indexDocument` or `removeDocument` before it
    /// touches each document.
    fn update_action(&self, action: &str, force: bool);

    /// A document finished, successfully or not
    fn new_index_result(
        &self,
        index: &IndexState,
        message: &str,
        status: &str,
        result_type: ResultType,
    );

    /// An error was recorded against a document
    fn new_index_error(
        &self,
        index: &IndexState,
        message: &str,
        exception: &str,
        severity: Severity,
    );
}

/// Runner that writes every event to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRunner;

impl IndexRunner for TracingRunner {
    fn update_action(&self, action: &str, force: bool) {
        tracing::debug!(action, force, "Runner action");
    }

    fn new_index_result(
        &self,
        index: &IndexState,
        message: &str,
        status: &str,
        result_type: ResultType,
    ) {
        match result_type {
            ResultType::Success => {
                tracing::info!(status, index_status = index.status.bits(), "Document indexed");
            }
            ResultType::Warning => tracing::warn!(status, message, "Document indexed with issues"),
            ResultType::Fail => tracing::error!(status, message, "Document not indexed"),
        }
    }

    fn new_index_error(
        &self,
        index: &IndexState,
        message: &str,
        exception: &str,
        severity: Severity,
    ) {
        tracing::error!(
            exception,
            severity = u8::from(severity),
            errors = index.errors.len(),
            "{message}"
        );
    }
}

/// One event seen by a [`RecordingRunner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent {
    Action {
        action: String,
        force: bool,
    },
    Result {
        message: String,
        status: String,
        result_type: ResultType,
    },
    Error {
        message: String,
        exception: String,
        severity: Severity,
    },
}

/// Runner that keeps every event in memory, in order
#[derive(Debug, Default)]
pub struct RecordingRunner {
    events: Mutex<Vec<RunnerEvent>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: RunnerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Events received so far (for test assertions)
    pub fn events(&self) -> Vec<RunnerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Result types received so far, in order
    pub fn result_types(&self) -> Vec<ResultType> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RunnerEvent::Result { result_type, .. } => Some(result_type),
                _ => None,
            })
            .collect()
    }
}

impl IndexRunner for RecordingRunner {
    fn update_action(&self, action: &str, force: bool) {
        self.push(RunnerEvent::Action {
            action: action.to_string(),
            force,
        });
    }

    fn new_index_result(
        &self,
        _index: &IndexState,
        message: &str,
        status: &str,
        result_type: ResultType,
    ) {
        self.push(RunnerEvent::Result {
            message: message.to_string(),
            status: status.to_string(),
            result_type,
        });
    }

    fn new_index_error(
        &self,
        _index: &IndexState,
        message: &str,
        exception: &str,
        severity: Severity,
    ) {
        self.push(RunnerEvent::Error {
            message: message.to_string(),
            exception: exception.to_string(),
            severity,
        });
    }
}
