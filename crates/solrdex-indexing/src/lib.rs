//! Indexing orchestration crate for solrdex
//!
//! Turns provider documents into engine write requests. The [`IndexMapper`]
//! knows how a document is shaped on the wire; the [`IndexRouter`] decides
//! which path a document takes, records the outcome on the document and
//! reports it to the host's runner. [`IndexMaintenance`] covers whole-index
//! operations (reset, optimize).

pub mod error;
pub mod maintenance;
pub mod mapper;
pub mod router;
pub mod runner;

// Re-export error types
pub use error::{IndexerError, IndexerResult};

// Re-export main orchestration types
pub use maintenance::{ALL_PROVIDERS, IndexMaintenance};
pub use mapper::IndexMapper;
pub use router::IndexRouter;
pub use runner::{IndexRunner, RecordingRunner, ResultType, RunnerEvent, TracingRunner};
