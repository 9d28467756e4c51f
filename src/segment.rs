//! Read-only view of an index and its segments.
//!
//! The verifier never opens or mutates storage itself. It is handed an
//! [`IndexReader`], checks that it holds exactly one segment, and reads that
//! segment through [`SegmentReader`].

pub mod memory;
pub mod snapshot;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::column::{
    BytesColumn, DictionaryColumn, FieldInfo, MultiDictionaryColumn, MultiNumericColumn,
    NumericColumn,
};
use crate::error::Result;
use crate::verify::{MissingPolicy, Selector, SortOrder};

/// A single immutable segment: `max_doc` document slots with a liveness
/// predicate and per-field column accessors.
pub trait SegmentReader {
    /// Segment identifier.
    fn name(&self) -> &str;

    /// One past the largest document ID.
    fn max_doc(&self) -> u64;

    /// Whether the document has not been deleted.
    fn is_live(&self, doc_id: u64) -> bool;

    /// Number of live documents.
    fn num_docs(&self) -> u64;

    fn num_deleted_docs(&self) -> u64 {
        self.max_doc() - self.num_docs()
    }

    /// Sort the segment declares it was written in, if any.
    fn index_sort(&self) -> Option<&IndexSort>;

    /// Schema entry for a field, or `None` if the field is not declared.
    fn field_info(&self, field: &str) -> Option<&FieldInfo>;

    fn numeric_column(&self, field: &str) -> Result<Box<dyn NumericColumn + '_>>;

    fn dictionary_column(&self, field: &str) -> Result<Box<dyn DictionaryColumn + '_>>;

    fn multi_numeric_column(&self, field: &str) -> Result<Box<dyn MultiNumericColumn + '_>>;

    fn multi_dictionary_column(&self, field: &str)
    -> Result<Box<dyn MultiDictionaryColumn + '_>>;

    fn bytes_column(&self, field: &str) -> Result<Box<dyn BytesColumn + '_>>;
}

/// An index made of zero or more segments.
pub trait IndexReader {
    fn segment_count(&self) -> usize;

    fn segment(&self, ord: usize) -> Option<&dyn SegmentReader>;
}

/// One key of a declared index sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Selector>,
}

impl SortField {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
            missing: None,
            selector: None,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.order)?;
        if let Some(missing) = self.missing {
            write!(f, " missing={missing}")?;
        }
        if let Some(selector) = self.selector {
            write!(f, " selector={selector}")?;
        }
        Ok(())
    }
}

/// Sort descriptor recorded in segment metadata by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexSort {
    pub fields: Vec<SortField>,
}

impl IndexSort {
    pub fn new(fields: Vec<SortField>) -> Self {
        Self { fields }
    }
}

impl fmt::Display for IndexSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}")?;
        }
        Ok(())
    }
}

/// Segment-level metadata shown by verbose reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub name: String,
    pub max_doc: u64,
    pub live_docs: u64,
    pub deleted_docs: u64,
    pub index_sort: Option<String>,
}

impl SegmentSummary {
    pub fn of(segment: &dyn SegmentReader) -> Self {
        Self {
            name: segment.name().to_string(),
            max_doc: segment.max_doc(),
            live_docs: segment.num_docs(),
            deleted_docs: segment.num_deleted_docs(),
            index_sort: segment.index_sort().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_sort_display() {
        let mut title = SortField::new("title", SortOrder::Descending);
        title.missing = Some(MissingPolicy::Last);
        let sort = IndexSort::new(vec![SortField::new("year", SortOrder::Ascending), title]);
        assert_eq!(sort.to_string(), "year asc, title desc missing=last");
    }

    #[test]
    fn test_index_sort_deserializes_from_list() {
        let json = r#"[{"field": "year"}, {"field": "tags", "order": "desc", "selector": "max"}]"#;
        let sort: IndexSort = serde_json::from_str(json).unwrap();
        assert_eq!(sort.fields.len(), 2);
        assert_eq!(sort.fields[0].order, SortOrder::Ascending);
        assert_eq!(sort.fields[1].selector, Some(Selector::Max));
    }
}
