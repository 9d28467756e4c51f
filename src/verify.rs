//! Sort verification.
//!
//! Checks that the live documents of a single-segment index, visited in
//! docID order, are ordered by the values of one column.
//!
//! # Module Structure
//!
//! - `policy`: pure rules for missing values, multi-value selection and ordering
//! - `cursor`: one positional adapter per column encoding
//! - `verifier`: the sequential scan
//! - `report`: text and JSON renderings of an outcome
//!
//! # Example
//!
//! ```
//! use iris_verifysort::segment::memory::{MemoryIndex, MemorySegment};
//! use iris_verifysort::verify::{SortOrder, SortVerifier, VerifyOptions};
//!
//! let segment = MemorySegment::builder("seg_0", 3)
//!     .numeric("year", vec![Some(1999), Some(2001), Some(2020)])
//!     .build()
//!     .unwrap();
//! let index = MemoryIndex::single(segment);
//!
//! let options = VerifyOptions::builder("year").order(SortOrder::Ascending).build();
//! let outcome = SortVerifier::new(options).verify(&index);
//! assert!(outcome.is_pass());
//! ```

pub mod cursor;
pub mod policy;
pub mod report;
pub mod verifier;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VerifyError;

pub use report::{OutputFormat, Report};
pub use verifier::{SortVerifier, Verification, VerifyOutcome};

/// Expected relation between consecutive live documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// `prev <= current`.
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// `prev >= current`.
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(VerifyError::invalid_argument(format!(
                "unknown sort order '{other}', expected asc or desc"
            ))),
        }
    }
}

/// Where documents without a value may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Any document without a value fails verification.
    #[default]
    Fail,
    /// Documents without a value precede all documents with one.
    First,
    /// Documents without a value follow all documents with one.
    Last,
}

impl MissingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingPolicy::Fail => "fail",
            MissingPolicy::First => "first",
            MissingPolicy::Last => "last",
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingPolicy {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(MissingPolicy::Fail),
            "first" => Ok(MissingPolicy::First),
            "last" => Ok(MissingPolicy::Last),
            other => Err(VerifyError::invalid_argument(format!(
                "unknown missing policy '{other}', expected fail, first or last"
            ))),
        }
    }
}

/// Which value represents a multi-valued document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    /// The smallest value.
    #[default]
    Min,
    /// The largest value.
    Max,
}

impl Selector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Selector::Min => "min",
            Selector::Max => "max",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selector {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "min" => Ok(Selector::Min),
            "max" => Ok(Selector::Max),
            other => Err(VerifyError::invalid_argument(format!(
                "unknown selector '{other}', expected min or max"
            ))),
        }
    }
}

/// Options for a verification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// Column to verify.
    pub field: String,

    #[serde(default)]
    pub order: SortOrder,

    #[serde(default)]
    pub missing: MissingPolicy,

    #[serde(default)]
    pub selector: Selector,

    /// Report segment metadata and extra violation detail.
    #[serde(default)]
    pub verbose: bool,
}

impl VerifyOptions {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::default(),
            missing: MissingPolicy::default(),
            selector: Selector::default(),
            verbose: false,
        }
    }

    pub fn builder(field: impl Into<String>) -> VerifyOptionsBuilder {
        VerifyOptionsBuilder {
            options: Self::new(field),
        }
    }
}

/// Builder for [`VerifyOptions`].
#[derive(Debug, Clone)]
pub struct VerifyOptionsBuilder {
    options: VerifyOptions,
}

impl VerifyOptionsBuilder {
    pub fn order(mut self, order: SortOrder) -> Self {
        self.options.order = order;
        self
    }

    pub fn missing(mut self, missing: MissingPolicy) -> Self {
        self.options.missing = missing;
        self
    }

    pub fn selector(mut self, selector: Selector) -> Self {
        self.options.selector = selector;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.options.verbose = verbose;
        self
    }

    pub fn build(self) -> VerifyOptions {
        self.options
    }
}
