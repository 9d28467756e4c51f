//! In-memory column storage and its positional accessors.

use std::collections::BTreeSet;

use crate::column::{
    BytesColumn, ColumnEncoding, DictionaryColumn, MultiDictionaryColumn, MultiNumericColumn,
    NumericColumn,
};
use crate::error::{Result, VerifyError};

/// A sorted dictionary of distinct byte strings plus per-document ordinals.
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryData {
    terms: Vec<Vec<u8>>,
    ords: Vec<Option<u64>>,
}

impl DictionaryData {
    /// Build from per-document terms. The dictionary is sorted and
    /// de-duplicated so that ordinal order equals byte order.
    pub fn from_values<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<Vec<u8>>,
    {
        let values: Vec<Option<Vec<u8>>> = values.into_iter().map(|v| v.map(Into::into)).collect();
        let terms: Vec<Vec<u8>> = values
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let ords = values
            .iter()
            .map(|v| v.as_ref().map(|term| ordinal_of(&terms, term)))
            .collect();
        Self { terms, ords }
    }

    /// Build from a raw dictionary and ordinals, as a storage layer would
    /// hand them over. Rejects dictionaries that are not strictly ascending,
    /// since ordinal comparison would then disagree with byte comparison.
    pub fn from_parts(terms: Vec<Vec<u8>>, ords: Vec<Option<u64>>) -> Result<Self> {
        check_dictionary(&terms)?;
        if let Some(ord) = ords.iter().flatten().find(|&&ord| ord >= terms.len() as u64) {
            return Err(VerifyError::storage(format!(
                "ordinal {ord} is out of range for a dictionary of {} terms",
                terms.len()
            )));
        }
        Ok(Self { terms, ords })
    }

    pub fn terms(&self) -> &[Vec<u8>] {
        &self.terms
    }

    pub fn ords(&self) -> &[Option<u64>] {
        &self.ords
    }
}

/// A sorted dictionary plus an ascending ordinal set per document.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDictionaryData {
    terms: Vec<Vec<u8>>,
    ords: Vec<Vec<u64>>,
}

impl MultiDictionaryData {
    /// Build from per-document term lists. Each document's terms become a
    /// set; an empty list means the document has no value.
    pub fn from_values<I, D, T>(values: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = T>,
        T: Into<Vec<u8>>,
    {
        let docs: Vec<Vec<Vec<u8>>> = values
            .into_iter()
            .map(|doc| doc.into_iter().map(Into::into).collect())
            .collect();
        let terms: Vec<Vec<u8>> = docs
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let ords = docs
            .iter()
            .map(|doc| {
                let mut ords: Vec<u64> = doc.iter().map(|term| ordinal_of(&terms, term)).collect();
                ords.sort_unstable();
                ords.dedup();
                ords
            })
            .collect();
        Self { terms, ords }
    }

    /// Build from a raw dictionary and per-document ordinal sets.
    pub fn from_parts(terms: Vec<Vec<u8>>, ords: Vec<Vec<u64>>) -> Result<Self> {
        check_dictionary(&terms)?;
        for (doc_id, doc) in ords.iter().enumerate() {
            if doc.windows(2).any(|w| w[0] >= w[1]) {
                return Err(VerifyError::storage(format!(
                    "ordinals of doc {doc_id} are not strictly ascending"
                )));
            }
            if doc.iter().any(|&ord| ord >= terms.len() as u64) {
                return Err(VerifyError::storage(format!(
                    "doc {doc_id} references an ordinal outside a dictionary of {} terms",
                    terms.len()
                )));
            }
        }
        Ok(Self { terms, ords })
    }

    pub fn terms(&self) -> &[Vec<u8>] {
        &self.terms
    }

    pub fn ords(&self) -> &[Vec<u64>] {
        &self.ords
    }
}

fn ordinal_of(terms: &[Vec<u8>], term: &[u8]) -> u64 {
    // Every term was inserted into the dictionary before ordinals are assigned.
    terms
        .binary_search_by(|probe| probe.as_slice().cmp(term))
        .unwrap_or_else(|pos| pos) as u64
}

fn check_dictionary(terms: &[Vec<u8>]) -> Result<()> {
    if let Some(pos) = terms.windows(2).position(|w| w[0] >= w[1]) {
        return Err(VerifyError::storage(format!(
            "dictionary is not strictly ascending at ordinal {}",
            pos + 1
        )));
    }
    Ok(())
}

/// Owned per-document values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<i64>>),
    Dictionary(DictionaryData),
    MultiNumeric(Vec<Vec<i64>>),
    MultiDictionary(MultiDictionaryData),
    Bytes(Vec<Option<Vec<u8>>>),
    Vector(Vec<Option<Vec<f32>>>),
}

impl ColumnData {
    /// Multi-numeric column with each document's values sorted ascending.
    pub fn multi_numeric<I, D>(values: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = i64>,
    {
        ColumnData::MultiNumeric(
            values
                .into_iter()
                .map(|doc| {
                    let mut doc: Vec<i64> = doc.into_iter().collect();
                    doc.sort_unstable();
                    doc
                })
                .collect(),
        )
    }

    pub fn encoding(&self) -> ColumnEncoding {
        match self {
            ColumnData::Numeric(_) => ColumnEncoding::Numeric,
            ColumnData::Dictionary(_) => ColumnEncoding::Dictionary,
            ColumnData::MultiNumeric(_) => ColumnEncoding::MultiNumeric,
            ColumnData::MultiDictionary(_) => ColumnEncoding::MultiDictionary,
            ColumnData::Bytes(_) => ColumnEncoding::Bytes,
            ColumnData::Vector(_) => ColumnEncoding::Vector,
        }
    }

    /// Number of document slots covered.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Dictionary(data) => data.ords.len(),
            ColumnData::MultiNumeric(values) => values.len(),
            ColumnData::MultiDictionary(data) => data.ords.len(),
            ColumnData::Bytes(values) => values.len(),
            ColumnData::Vector(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Accessor over [`ColumnData::Numeric`].
#[derive(Debug)]
pub struct MemoryNumericColumn<'a> {
    values: &'a [Option<i64>],
    current: i64,
}

impl<'a> MemoryNumericColumn<'a> {
    pub fn new(values: &'a [Option<i64>]) -> Self {
        Self { values, current: 0 }
    }
}

impl NumericColumn for MemoryNumericColumn<'_> {
    fn advance_exact(&mut self, doc_id: u64) -> bool {
        match self.values.get(doc_id as usize) {
            Some(Some(value)) => {
                self.current = *value;
                true
            }
            _ => false,
        }
    }

    fn long_value(&self) -> i64 {
        self.current
    }
}

/// Accessor over [`ColumnData::Dictionary`].
#[derive(Debug)]
pub struct MemoryDictionaryColumn<'a> {
    data: &'a DictionaryData,
    current: u64,
}

impl<'a> MemoryDictionaryColumn<'a> {
    pub fn new(data: &'a DictionaryData) -> Self {
        Self { data, current: 0 }
    }
}

impl DictionaryColumn for MemoryDictionaryColumn<'_> {
    fn advance_exact(&mut self, doc_id: u64) -> bool {
        match self.data.ords.get(doc_id as usize) {
            Some(Some(ord)) => {
                self.current = *ord;
                true
            }
            _ => false,
        }
    }

    fn ord_value(&self) -> u64 {
        self.current
    }

    fn lookup_ord(&self, ord: u64) -> Option<&[u8]> {
        self.data.terms.get(ord as usize).map(Vec::as_slice)
    }

    fn value_count(&self) -> u64 {
        self.data.terms.len() as u64
    }
}

/// Accessor over [`ColumnData::MultiNumeric`].
#[derive(Debug)]
pub struct MemoryMultiNumericColumn<'a> {
    values: &'a [Vec<i64>],
    current: &'a [i64],
}

impl<'a> MemoryMultiNumericColumn<'a> {
    pub fn new(values: &'a [Vec<i64>]) -> Self {
        Self {
            values,
            current: &[],
        }
    }
}

impl MultiNumericColumn for MemoryMultiNumericColumn<'_> {
    fn advance_exact(&mut self, doc_id: u64) -> bool {
        self.current = self
            .values
            .get(doc_id as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        !self.current.is_empty()
    }

    fn values(&self) -> &[i64] {
        self.current
    }
}

/// Accessor over [`ColumnData::MultiDictionary`].
#[derive(Debug)]
pub struct MemoryMultiDictionaryColumn<'a> {
    data: &'a MultiDictionaryData,
    current: &'a [u64],
}

impl<'a> MemoryMultiDictionaryColumn<'a> {
    pub fn new(data: &'a MultiDictionaryData) -> Self {
        Self { data, current: &[] }
    }
}

impl MultiDictionaryColumn for MemoryMultiDictionaryColumn<'_> {
    fn advance_exact(&mut self, doc_id: u64) -> bool {
        self.current = self
            .data
            .ords
            .get(doc_id as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        !self.current.is_empty()
    }

    fn ords(&self) -> &[u64] {
        self.current
    }

    fn lookup_ord(&self, ord: u64) -> Option<&[u8]> {
        self.data.terms.get(ord as usize).map(Vec::as_slice)
    }

    fn value_count(&self) -> u64 {
        self.data.terms.len() as u64
    }
}

/// Accessor over [`ColumnData::Bytes`].
#[derive(Debug)]
pub struct MemoryBytesColumn<'a> {
    values: &'a [Option<Vec<u8>>],
    current: &'a [u8],
}

impl<'a> MemoryBytesColumn<'a> {
    pub fn new(values: &'a [Option<Vec<u8>>]) -> Self {
        Self {
            values,
            current: &[],
        }
    }
}

impl BytesColumn for MemoryBytesColumn<'_> {
    fn advance_exact(&mut self, doc_id: u64) -> bool {
        match self.values.get(doc_id as usize) {
            Some(Some(value)) => {
                self.current = value.as_slice();
                true
            }
            _ => false,
        }
    }

    fn binary_value(&self) -> &[u8] {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_ords_follow_byte_order() {
        let data =
            DictionaryData::from_values(vec![Some("pear"), None, Some("apple"), Some("pear")]);
        assert_eq!(data.terms(), &[b"apple".to_vec(), b"pear".to_vec()]);
        assert_eq!(data.ords(), &[Some(1), None, Some(0), Some(1)]);
    }

    #[test]
    fn test_dictionary_from_parts_rejects_unsorted_terms() {
        let result = DictionaryData::from_parts(
            vec![b"zebra".to_vec(), b"apple".to_vec()],
            vec![Some(0), Some(1)],
        );
        assert!(matches!(result, Err(VerifyError::Storage(_))));

        let duplicate = DictionaryData::from_parts(
            vec![b"apple".to_vec(), b"apple".to_vec()],
            vec![Some(0)],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_dictionary_from_parts_rejects_out_of_range_ord() {
        let result = DictionaryData::from_parts(vec![b"a".to_vec()], vec![Some(1)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_multi_dictionary_sets_are_sorted_and_deduplicated() {
        let data = MultiDictionaryData::from_values(vec![vec!["c", "a", "c"], vec![], vec!["b"]]);
        assert_eq!(data.ords(), &[vec![0, 2], vec![], vec![1]]);

        let unsorted = MultiDictionaryData::from_parts(
            vec![b"a".to_vec(), b"b".to_vec()],
            vec![vec![1, 0]],
        );
        assert!(unsorted.is_err());
    }

    #[test]
    fn test_multi_numeric_values_are_sorted() {
        let data = ColumnData::multi_numeric(vec![vec![9, 3, 7], vec![]]);
        assert_eq!(data, ColumnData::MultiNumeric(vec![vec![3, 7, 9], vec![]]));
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_numeric_accessor() {
        let values = vec![Some(5), None, Some(-3)];
        let mut column = MemoryNumericColumn::new(&values);
        assert!(column.advance_exact(0));
        assert_eq!(column.long_value(), 5);
        assert!(!column.advance_exact(1));
        assert!(column.advance_exact(2));
        assert_eq!(column.long_value(), -3);
        assert!(!column.advance_exact(3));
    }

    #[test]
    fn test_multi_numeric_accessor_reports_empty_as_missing() {
        let values = vec![vec![1, 2], vec![]];
        let mut column = MemoryMultiNumericColumn::new(&values);
        assert!(column.advance_exact(0));
        assert_eq!(column.values(), &[1, 2]);
        assert!(!column.advance_exact(1));
    }

    #[test]
    fn test_dictionary_accessor_lookup() {
        let data = DictionaryData::from_values(vec![Some("b"), Some("a")]);
        let mut column = MemoryDictionaryColumn::new(&data);
        assert!(column.advance_exact(0));
        assert_eq!(column.ord_value(), 1);
        assert_eq!(column.lookup_ord(1), Some(&b"b"[..]));
        assert_eq!(column.lookup_ord(2), None);
        assert_eq!(column.value_count(), 2);
    }

    #[test]
    fn test_bytes_accessor() {
        let values = vec![None, Some(vec![0xff, 0x00])];
        let mut column = MemoryBytesColumn::new(&values);
        assert!(!column.advance_exact(0));
        assert!(column.advance_exact(1));
        assert_eq!(column.binary_value(), &[0xff, 0x00]);
    }
}
