//! Per-document column storage ("doc values") as seen by the verifier.
//!
//! A field declared in a segment either carries no per-document values, or
//! stores them in exactly one [`ColumnEncoding`]. Each encoding is read
//! through its own positional accessor trait; all accessors share the same
//! forward-only protocol:
//!
//! 1. `advance_exact(doc_id)` positions the accessor on a document and
//!    reports whether that document has a value.
//! 2. The value getters are only meaningful right after an `advance_exact`
//!    that returned `true`.
//!
//! Callers must visit document IDs in increasing order.

pub mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical encoding of a column's per-document values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnEncoding {
    /// One signed 64-bit integer per document.
    Numeric,
    /// One ordinal per document into a sorted dictionary of byte strings.
    Dictionary,
    /// An ascending list of signed 64-bit integers per document.
    MultiNumeric,
    /// An ascending set of ordinals per document into a sorted dictionary.
    MultiDictionary,
    /// One opaque byte string per document.
    Bytes,
    /// A dense float vector per document. Vectors have no total order.
    Vector,
}

impl ColumnEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnEncoding::Numeric => "numeric",
            ColumnEncoding::Dictionary => "dictionary",
            ColumnEncoding::MultiNumeric => "multi-numeric",
            ColumnEncoding::MultiDictionary => "multi-dictionary",
            ColumnEncoding::Bytes => "bytes",
            ColumnEncoding::Vector => "vector",
        }
    }

    /// Whether a document may carry more than one value.
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            ColumnEncoding::MultiNumeric | ColumnEncoding::MultiDictionary
        )
    }
}

impl fmt::Display for ColumnEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Schema entry for a field in a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Field name.
    pub name: String,
    /// Encoding of the per-document values, or `None` when the field is
    /// declared without doc values (e.g. stored or indexed only).
    pub encoding: Option<ColumnEncoding>,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, encoding: Option<ColumnEncoding>) -> Self {
        Self {
            name: name.into(),
            encoding,
        }
    }
}

/// Single-valued signed integers.
pub trait NumericColumn {
    fn advance_exact(&mut self, doc_id: u64) -> bool;

    fn long_value(&self) -> i64;
}

/// Single-valued ordinals into a sorted dictionary.
///
/// Ordinal order must match the byte order of the dictionary terms. The
/// verifier compares ordinals only and relies on this.
pub trait DictionaryColumn {
    fn advance_exact(&mut self, doc_id: u64) -> bool;

    fn ord_value(&self) -> u64;

    /// Look up the dictionary term for an ordinal.
    fn lookup_ord(&self, ord: u64) -> Option<&[u8]>;

    fn value_count(&self) -> u64;
}

/// Multi-valued signed integers, ascending per document.
pub trait MultiNumericColumn {
    fn advance_exact(&mut self, doc_id: u64) -> bool;

    /// Values of the current document in ascending order. Never empty after
    /// a successful `advance_exact`.
    fn values(&self) -> &[i64];
}

/// Multi-valued ordinals, ascending per document.
pub trait MultiDictionaryColumn {
    fn advance_exact(&mut self, doc_id: u64) -> bool;

    /// Ordinals of the current document in ascending order.
    fn ords(&self) -> &[u64];

    fn lookup_ord(&self, ord: u64) -> Option<&[u8]>;

    fn value_count(&self) -> u64;
}

/// Single-valued opaque byte strings.
pub trait BytesColumn {
    fn advance_exact(&mut self, doc_id: u64) -> bool;

    fn binary_value(&self) -> &[u8];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_names() {
        assert_eq!(ColumnEncoding::MultiDictionary.to_string(), "multi-dictionary");
        assert!(ColumnEncoding::MultiNumeric.is_multi_valued());
        assert!(!ColumnEncoding::Bytes.is_multi_valued());
    }

    #[test]
    fn test_encoding_serde_names() {
        let json = serde_json::to_string(&ColumnEncoding::MultiNumeric).unwrap();
        assert_eq!(json, "\"multi_numeric\"");
        let parsed: ColumnEncoding = serde_json::from_str("\"dictionary\"").unwrap();
        assert_eq!(parsed, ColumnEncoding::Dictionary);
    }
}
