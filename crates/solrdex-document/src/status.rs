//! Index status bookkeeping carried by each document

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Bit set describing what the host wants done with a document, or what happened to it
///
/// Bit values are shared with the host application and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct IndexStatus(u32);

impl IndexStatus {
    pub const OK: Self = Self(1);
    pub const IGNORE: Self = Self(2);
    pub const META: Self = Self(4);
    pub const CONTENT: Self = Self(8);
    pub const PARTS: Self = Self(16);
    pub const FULL: Self = Self(28);
    pub const REMOVE: Self = Self(32);
    pub const DONE: Self = Self(64);
    pub const FAILED: Self = Self(128);

    /// Status from raw host bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when every bit of `other` is set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of both statuses
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for IndexStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// How bad a recorded indexing error is; the numeric value is what the host stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum Severity {
    Notice = 1,
    Warning = 2,
    Error = 3,
    Critical = 4,
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity as Self
    }
}

/// One failure recorded against a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexErrorRecord {
    pub message: String,
    /// Error category name, e.g. `DataExtractionFailed`
    pub exception: String,
    pub severity: Severity,
}

/// Mutable index bookkeeping of a document: the only part the mapping layer writes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexState {
    pub status: IndexStatus,
    pub errors: Vec<IndexErrorRecord>,
    pub last_index: Option<DateTime<Utc>>,
}

impl IndexState {
    /// Fresh state with the given status and no history
    pub fn with_status(status: IndexStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    /// Append an error, keeping earlier ones in order
    pub fn add_error(
        &mut self,
        message: impl Into<String>,
        exception: impl Into<String>,
        severity: Severity,
    ) {
        self.errors.push(IndexErrorRecord {
            message: message.into(),
            exception: exception.into(),
            severity,
        });
    }

    /// Mark the document as fully processed at `now`
    pub fn mark_done(&mut self, now: DateTime<Utc>) {
        self.status = IndexStatus::DONE;
        self.last_index = Some(now);
    }

    /// Mark the document as failed
    pub fn mark_failed(&mut self) {
        self.status = IndexStatus::FAILED;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_is_meta_content_parts() {
        assert_eq!(
            IndexStatus::META | IndexStatus::CONTENT | IndexStatus::PARTS,
            IndexStatus::FULL
        );
    }

    #[test]
    fn test_contains_checks_all_bits() {
        let status = IndexStatus::REMOVE | IndexStatus::OK;
        assert!(status.contains(IndexStatus::REMOVE));
        assert!(!status.contains(IndexStatus::CONTENT));
        assert!(!IndexStatus::META.contains(IndexStatus::FULL));
    }

    #[test]
    fn test_errors_keep_order() {
        let mut state = IndexState::with_status(IndexStatus::FULL);
        state.add_error("first", "A", Severity::Warning);
        state.add_error("second", "B", Severity::Error);

        assert_eq!(state.errors.last().map(|e| e.severity), Some(Severity::Error));
        assert_eq!(
            state.errors.iter().map(|e| e.message.as_str()).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_severity_serializes_as_number() {
        let json = serde_json::to_string(&Severity::Error).unwrap_or_default();
        assert_eq!(json, "3");
    }
}
