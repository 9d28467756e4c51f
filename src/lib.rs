//! # Iris VerifySort
//!
//! Checks that a single-segment index is sorted by one doc values field in
//! docID order.
//!
//! ## Features
//!
//! - Five column encodings behind one scan: numeric, dictionary,
//!   multi-numeric, multi-dictionary and opaque bytes
//! - Ascending or descending order, ties allowed
//! - Missing values may fail the run, sort first, or sort last
//! - Multi-valued documents reduced by a min or max selector
//! - Deleted documents are skipped
//! - Text and JSON reports
// Core modules
pub mod column;
mod error;
pub mod segment;
pub mod verify;

// Re-exports for the public API
pub use column::{ColumnEncoding, FieldInfo};
pub use error::{OrderViolation, Result, VerifyError};
pub use segment::memory::{MemoryIndex, MemorySegment};
pub use segment::{IndexReader, IndexSort, SegmentReader, SortField};
pub use verify::{
    MissingPolicy, OutputFormat, Report, Selector, SortOrder, SortVerifier, VerifyOptions,
    VerifyOutcome,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
