//! In-memory segments.
//!
//! [`MemorySegment`] keeps every column fully materialized and tracks
//! deletions in a bitmap. It backs the JSON snapshot loader and the tests.

use ahash::AHashMap;
use bit_vec::BitVec;

use crate::column::memory::{
    ColumnData, DictionaryData, MemoryBytesColumn, MemoryDictionaryColumn,
    MemoryMultiDictionaryColumn, MemoryMultiNumericColumn, MemoryNumericColumn,
    MultiDictionaryData,
};
use crate::column::{
    BytesColumn, ColumnEncoding, DictionaryColumn, FieldInfo, MultiDictionaryColumn,
    MultiNumericColumn, NumericColumn,
};
use crate::error::{Result, VerifyError};
use crate::segment::{IndexReader, IndexSort, SegmentReader};

#[derive(Debug, Clone)]
struct MemoryField {
    info: FieldInfo,
    data: Option<ColumnData>,
}

/// A fully materialized segment.
#[derive(Debug, Clone)]
pub struct MemorySegment {
    name: String,
    max_doc: u64,
    /// `true` for live documents.
    live_docs: BitVec,
    num_docs: u64,
    index_sort: Option<IndexSort>,
    fields: AHashMap<String, MemoryField>,
}

impl MemorySegment {
    pub fn builder(name: impl Into<String>, max_doc: u64) -> MemorySegmentBuilder {
        MemorySegmentBuilder::new(name, max_doc)
    }

    /// Names of all declared fields, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// IDs of deleted documents in ascending order.
    pub fn deleted_docs(&self) -> Vec<u64> {
        self.live_docs
            .iter()
            .enumerate()
            .filter(|(_, live)| !live)
            .map(|(doc_id, _)| doc_id as u64)
            .collect()
    }

    pub fn column(&self, field: &str) -> Option<&ColumnData> {
        self.fields.get(field).and_then(|f| f.data.as_ref())
    }

    fn column_for(&self, field: &str, expected: ColumnEncoding) -> Result<&ColumnData> {
        let data = self
            .fields
            .get(field)
            .and_then(|f| f.data.as_ref())
            .ok_or_else(|| {
                VerifyError::storage(format!("no column data for field '{field}'"))
            })?;
        if data.encoding() != expected {
            return Err(VerifyError::storage(format!(
                "field '{field}' is stored as {}, expected {expected}",
                data.encoding()
            )));
        }
        if data.len() as u64 != self.max_doc {
            return Err(VerifyError::storage(format!(
                "column for field '{field}' covers {} documents but the segment has {}",
                data.len(),
                self.max_doc
            )));
        }
        Ok(data)
    }
}

impl SegmentReader for MemorySegment {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_doc(&self) -> u64 {
        self.max_doc
    }

    fn is_live(&self, doc_id: u64) -> bool {
        self.live_docs.get(doc_id as usize).unwrap_or(false)
    }

    fn num_docs(&self) -> u64 {
        self.num_docs
    }

    fn index_sort(&self) -> Option<&IndexSort> {
        self.index_sort.as_ref()
    }

    fn field_info(&self, field: &str) -> Option<&FieldInfo> {
        self.fields.get(field).map(|f| &f.info)
    }

    fn numeric_column(&self, field: &str) -> Result<Box<dyn NumericColumn + '_>> {
        match self.column_for(field, ColumnEncoding::Numeric)? {
            ColumnData::Numeric(values) => Ok(Box::new(MemoryNumericColumn::new(values))),
            _ => unreachable!("encoding checked by column_for"),
        }
    }

    fn dictionary_column(&self, field: &str) -> Result<Box<dyn DictionaryColumn + '_>> {
        match self.column_for(field, ColumnEncoding::Dictionary)? {
            ColumnData::Dictionary(data) => Ok(Box::new(MemoryDictionaryColumn::new(data))),
            _ => unreachable!("encoding checked by column_for"),
        }
    }

    fn multi_numeric_column(&self, field: &str) -> Result<Box<dyn MultiNumericColumn + '_>> {
        match self.column_for(field, ColumnEncoding::MultiNumeric)? {
            ColumnData::MultiNumeric(values) => Ok(Box::new(MemoryMultiNumericColumn::new(values))),
            _ => unreachable!("encoding checked by column_for"),
        }
    }

    fn multi_dictionary_column(
        &self,
        field: &str,
    ) -> Result<Box<dyn MultiDictionaryColumn + '_>> {
        match self.column_for(field, ColumnEncoding::MultiDictionary)? {
            ColumnData::MultiDictionary(data) => {
                Ok(Box::new(MemoryMultiDictionaryColumn::new(data)))
            }
            _ => unreachable!("encoding checked by column_for"),
        }
    }

    fn bytes_column(&self, field: &str) -> Result<Box<dyn BytesColumn + '_>> {
        match self.column_for(field, ColumnEncoding::Bytes)? {
            ColumnData::Bytes(values) => Ok(Box::new(MemoryBytesColumn::new(values))),
            _ => unreachable!("encoding checked by column_for"),
        }
    }
}

/// Builder for [`MemorySegment`].
#[derive(Debug)]
pub struct MemorySegmentBuilder {
    name: String,
    max_doc: u64,
    deleted: Vec<u64>,
    index_sort: Option<IndexSort>,
    fields: AHashMap<String, MemoryField>,
}

impl MemorySegmentBuilder {
    pub fn new(name: impl Into<String>, max_doc: u64) -> Self {
        Self {
            name: name.into(),
            max_doc,
            deleted: Vec::new(),
            index_sort: None,
            fields: AHashMap::new(),
        }
    }

    /// Mark a document as deleted.
    pub fn delete(mut self, doc_id: u64) -> Self {
        self.deleted.push(doc_id);
        self
    }

    pub fn index_sort(mut self, sort: IndexSort) -> Self {
        self.index_sort = Some(sort);
        self
    }

    /// Add a column with pre-built data.
    pub fn column(mut self, field: impl Into<String>, data: ColumnData) -> Self {
        let name = field.into();
        let info = FieldInfo::new(name.clone(), Some(data.encoding()));
        self.fields.insert(
            name,
            MemoryField {
                info,
                data: Some(data),
            },
        );
        self
    }

    pub fn numeric(self, field: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        self.column(field, ColumnData::Numeric(values))
    }

    pub fn dictionary<T: Into<Vec<u8>>>(
        self,
        field: impl Into<String>,
        values: Vec<Option<T>>,
    ) -> Self {
        self.column(field, ColumnData::Dictionary(DictionaryData::from_values(values)))
    }

    pub fn multi_numeric(self, field: impl Into<String>, values: Vec<Vec<i64>>) -> Self {
        self.column(field, ColumnData::multi_numeric(values))
    }

    pub fn multi_dictionary<T: Into<Vec<u8>>>(
        self,
        field: impl Into<String>,
        values: Vec<Vec<T>>,
    ) -> Self {
        self.column(
            field,
            ColumnData::MultiDictionary(MultiDictionaryData::from_values(values)),
        )
    }

    pub fn bytes<T: Into<Vec<u8>>>(self, field: impl Into<String>, values: Vec<Option<T>>) -> Self {
        self.column(
            field,
            ColumnData::Bytes(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    pub fn vector(self, field: impl Into<String>, values: Vec<Option<Vec<f32>>>) -> Self {
        self.column(field, ColumnData::Vector(values))
    }

    /// Declare a field that carries no per-document values.
    pub fn stored_only(mut self, field: impl Into<String>) -> Self {
        let name = field.into();
        let info = FieldInfo::new(name.clone(), None);
        self.fields.insert(name, MemoryField { info, data: None });
        self
    }

    pub fn build(self) -> Result<MemorySegment> {
        let max_doc = usize::try_from(self.max_doc).map_err(|_| {
            VerifyError::invalid_argument(format!("max_doc {} is too large", self.max_doc))
        })?;
        let mut live_docs = BitVec::from_elem(max_doc, true);
        for doc_id in self.deleted {
            if doc_id >= self.max_doc {
                return Err(VerifyError::invalid_argument(format!(
                    "Document ID {doc_id} is out of range [0, {}) for segment {}",
                    self.max_doc, self.name
                )));
            }
            live_docs.set(doc_id as usize, false);
        }
        let num_docs = live_docs.iter().filter(|live| *live).count() as u64;

        Ok(MemorySegment {
            name: self.name,
            max_doc: self.max_doc,
            live_docs,
            num_docs,
            index_sort: self.index_sort,
            fields: self.fields,
        })
    }
}

/// An ordered list of in-memory segments.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    segments: Vec<MemorySegment>,
}

impl MemoryIndex {
    pub fn new(segments: Vec<MemorySegment>) -> Self {
        Self { segments }
    }

    /// Index made of a single segment.
    pub fn single(segment: MemorySegment) -> Self {
        Self::new(vec![segment])
    }

    pub fn segments(&self) -> &[MemorySegment] {
        &self.segments
    }
}

impl IndexReader for MemoryIndex {
    fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn segment(&self, ord: usize) -> Option<&dyn SegmentReader> {
        self.segments.get(ord).map(|s| s as &dyn SegmentReader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liveness_and_counts() -> Result<()> {
        let segment = MemorySegment::builder("seg_0", 4)
            .numeric("year", vec![Some(1), Some(2), Some(3), Some(4)])
            .delete(1)
            .delete(3)
            .delete(3)
            .build()?;

        assert!(segment.is_live(0));
        assert!(!segment.is_live(1));
        assert!(!segment.is_live(3));
        assert!(!segment.is_live(4));
        assert_eq!(segment.num_docs(), 2);
        assert_eq!(segment.num_deleted_docs(), 2);
        assert_eq!(segment.deleted_docs(), vec![1, 3]);
        Ok(())
    }

    #[test]
    fn test_delete_out_of_range_is_rejected() {
        let result = MemorySegment::builder("seg_0", 2).delete(2).build();
        assert!(matches!(result, Err(VerifyError::InvalidArgument(_))));
    }

    #[test]
    fn test_field_info() -> Result<()> {
        let segment = MemorySegment::builder("seg_0", 1)
            .bytes("payload", vec![Some("x")])
            .stored_only("body")
            .build()?;

        assert_eq!(
            segment.field_info("payload").and_then(|f| f.encoding),
            Some(ColumnEncoding::Bytes)
        );
        assert_eq!(segment.field_info("body").map(|f| f.encoding), Some(None));
        assert!(segment.field_info("missing").is_none());
        assert_eq!(segment.field_names(), vec!["body", "payload"]);
        Ok(())
    }

    #[test]
    fn test_wrong_accessor_kind_is_a_storage_error() -> Result<()> {
        let segment = MemorySegment::builder("seg_0", 1)
            .numeric("year", vec![Some(1)])
            .build()?;
        assert!(segment.numeric_column("year").is_ok());
        assert!(matches!(
            segment.bytes_column("year"),
            Err(VerifyError::Storage(_))
        ));
        Ok(())
    }

    #[test]
    fn test_short_column_is_a_storage_error() -> Result<()> {
        let segment = MemorySegment::builder("seg_0", 3)
            .numeric("year", vec![Some(1)])
            .build()?;
        assert!(segment.numeric_column("year").is_err());
        Ok(())
    }

    #[test]
    fn test_memory_index_segments() -> Result<()> {
        let index = MemoryIndex::new(vec![
            MemorySegment::builder("seg_0", 0).build()?,
            MemorySegment::builder("seg_1", 0).build()?,
        ]);
        assert_eq!(index.segment_count(), 2);
        assert_eq!(index.segment(1).map(|s| s.name()), Some("seg_1"));
        assert!(index.segment(2).is_none());
        Ok(())
    }
}
