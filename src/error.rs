//! Query error types
//!
//! Error codes:
//! - KQ_SCHEMA_INVALID (FATAL)
//! - KQ_AMBIGUOUS_INDEX (FATAL)
//! - KQ_UNSUPPORTED_OPERATION (REJECT)
//! - KQ_UNSUPPORTED_VALUE (REJECT)
//! - KQ_INVALID_FILTER_EXPRESSION (REJECT)
//! - KQ_INCORRECT_RESULT_SIZE (REJECT)
//! - KQ_EMPTY_RESULT (REJECT)
//! - KQ_STORE_FAILED (ERROR)
//!
//! Nothing here is retried. Schema and index errors are authoring bugs that
//! surface on first use; the rest are per-query rejections.

use std::fmt;

use thiserror::Error;

use crate::schema::SchemaError;
use crate::store::StoreError;

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The query is rejected; the caller must rewrite it
    Reject,
    /// The collaborator failed while executing a valid request
    Error,
    /// Entity metadata is unusable until the declaration is fixed
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Stable, machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    SchemaInvalid,
    AmbiguousIndex,
    UnsupportedOperation,
    UnsupportedValue,
    InvalidFilterExpression,
    IncorrectResultSize,
    EmptyResult,
    StoreFailed,
}

impl ErrorCode {
    /// Returns the string code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SchemaInvalid => "KQ_SCHEMA_INVALID",
            ErrorCode::AmbiguousIndex => "KQ_AMBIGUOUS_INDEX",
            ErrorCode::UnsupportedOperation => "KQ_UNSUPPORTED_OPERATION",
            ErrorCode::UnsupportedValue => "KQ_UNSUPPORTED_VALUE",
            ErrorCode::InvalidFilterExpression => "KQ_INVALID_FILTER_EXPRESSION",
            ErrorCode::IncorrectResultSize => "KQ_INCORRECT_RESULT_SIZE",
            ErrorCode::EmptyResult => "KQ_EMPTY_RESULT",
            ErrorCode::StoreFailed => "KQ_STORE_FAILED",
        }
    }

    /// Returns the severity level for this code
    pub fn severity(&self) -> Severity {
        match self {
            ErrorCode::SchemaInvalid | ErrorCode::AmbiguousIndex => Severity::Fatal,
            ErrorCode::StoreFailed => Severity::Error,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while deriving, executing or shaping a query
#[derive(Debug, Error)]
pub enum QueryError {
    /// Entity key metadata is malformed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// More than one index is declared on exactly the queried attribute set
    #[error("indexes {indexes:?} are all declared on exactly the attributes {attributes:?}")]
    AmbiguousIndex {
        indexes: Vec<String>,
        attributes: Vec<String>,
    },

    /// Comparator, sort or result shape not legal for the resolved access path
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A value cannot be encoded for its attribute
    #[error("unsupported value for '{property}': {reason}")]
    UnsupportedValue { property: String, reason: String },

    /// A raw filter expression references unbound or reserved placeholders
    #[error("invalid filter expression: {0}")]
    InvalidFilterExpression(String),

    /// A single-result query matched more than one item
    #[error("incorrect result size: expected {expected}, actual {actual}")]
    IncorrectResultSize { expected: usize, actual: usize },

    /// A delete by key found nothing to delete
    #[error("empty result: expected {expected} item(s), found none")]
    EmptyResult { expected: usize },

    /// The store collaborator failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        QueryError::UnsupportedOperation(reason.into())
    }

    pub(crate) fn unsupported_value(property: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryError::UnsupportedValue {
            property: property.into(),
            reason: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            QueryError::Schema(_) => ErrorCode::SchemaInvalid,
            QueryError::AmbiguousIndex { .. } => ErrorCode::AmbiguousIndex,
            QueryError::UnsupportedOperation(_) => ErrorCode::UnsupportedOperation,
            QueryError::UnsupportedValue { .. } => ErrorCode::UnsupportedValue,
            QueryError::InvalidFilterExpression(_) => ErrorCode::InvalidFilterExpression,
            QueryError::IncorrectResultSize { .. } => ErrorCode::IncorrectResultSize,
            QueryError::EmptyResult { .. } => ErrorCode::EmptyResult,
            QueryError::Store(_) => ErrorCode::StoreFailed,
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code().severity()
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
