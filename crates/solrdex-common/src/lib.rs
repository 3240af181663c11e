//! Common utilities shared across solrdex crates
//!
//! Holds the correlation id used to tie log lines of one indexing or search
//! operation together, plus one-time process initialization.

pub mod correlation;
pub mod init;

pub use correlation::CorrelationId;
pub use init::initialize_environment;
