//! Error types for sort verification.
//!
//! Setup failures (segment count, field resolution, accessor loading) and
//! ordering violations share one enum so that a verification run can be
//! expressed as a single `Result`. [`VerifyError::is_violation`] tells the
//! two apart.

use std::io;

use thiserror::Error;

use crate::column::ColumnEncoding;

/// Result type alias for verification operations.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Two consecutive live documents whose values violate the requested order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation {
    /// Field being verified.
    pub field: String,
    /// Most recent live document before `doc_id`.
    pub prev_doc_id: u64,
    /// Document at which the violation was detected.
    pub doc_id: u64,
    /// Rendered value of the previous document.
    pub prev_value: String,
    /// Rendered value of the current document.
    pub current_value: String,
    /// Extra encoding-specific detail, shown in verbose reports.
    pub detail: Option<String>,
}

/// Errors raised while resolving, loading or scanning a column.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("index must have exactly 1 segment; found {found}")]
    SegmentCount { found: usize },

    #[error("field not found: {field}")]
    FieldNotFound { field: String },

    #[error("field has no doc values: {field}")]
    NoDocValues { field: String },

    #[error("unable to load {encoding} doc values for field: {field} ({source})")]
    AccessorLoad {
        field: String,
        encoding: ColumnEncoding,
        #[source]
        source: Box<VerifyError>,
    },

    #[error("unsupported column encoding for sort verification: {encoding}")]
    UnsupportedEncoding {
        field: String,
        encoding: ColumnEncoding,
    },

    #[error("doc {doc_id} is missing a value for field: {field}")]
    MissingValue { field: String, doc_id: u64 },

    #[error(
        "missing value ordering violated at doc {doc_id} (prev doc {prev_doc_id}) for field: {field}"
    )]
    MissingOrderViolation {
        field: String,
        prev_doc_id: u64,
        doc_id: u64,
    },

    #[error(
        "order violated at doc {} (prev doc {} value={}, current value={})",
        .0.doc_id, .0.prev_doc_id, .0.prev_value, .0.current_value
    )]
    OrderViolation(Box<OrderViolation>),

    #[error("verification interrupted at doc {doc_id}")]
    Interrupted { doc_id: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl VerifyError {
    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        VerifyError::InvalidArgument(msg.into())
    }

    /// Create a storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        VerifyError::Storage(msg.into())
    }

    /// Whether this error is an ordering violation found while scanning,
    /// as opposed to a failure that prevented the scan from starting.
    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            VerifyError::MissingValue { .. }
                | VerifyError::MissingOrderViolation { .. }
                | VerifyError::OrderViolation(_)
        )
    }

    /// Whether the run stopped before reaching a verdict.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, VerifyError::Interrupted { .. })
    }

    /// Short machine-readable name of the violated rule.
    pub fn kind(&self) -> &'static str {
        match self {
            VerifyError::SegmentCount { .. } => "precondition_failure",
            VerifyError::FieldNotFound { .. } => "field_not_found",
            VerifyError::NoDocValues { .. } => "no_doc_values",
            VerifyError::AccessorLoad { .. } => "accessor_load_error",
            VerifyError::UnsupportedEncoding { .. } => "unsupported_encoding",
            VerifyError::MissingValue { .. } => "missing_value",
            VerifyError::MissingOrderViolation { .. } => "missing_order_violation",
            VerifyError::OrderViolation(_) => "order_violation",
            VerifyError::Interrupted { .. } => "interrupted",
            VerifyError::Io(_) => "io",
            VerifyError::Json(_) => "json",
            VerifyError::InvalidArgument(_) => "invalid_argument",
            VerifyError::Storage(_) => "storage",
        }
    }
}
