//! Error types for watchlog-core.

use thiserror::Error;

/// Errors raised when a draft entry cannot be persisted as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    EmptyTitle,

    #[error("{field} must not be negative (got {value})")]
    NegativeNumber { field: &'static str, value: i32 },
}

/// Errors raised when parsing enum values and view parameters from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid {kind}: {value}")]
    InvalidValue { kind: &'static str, value: String },
}

impl ParseError {
    pub(crate) fn invalid(kind: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            kind,
            value: value.to_string(),
        }
    }
}
