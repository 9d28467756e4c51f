//! Positional adapters that present every column encoding through one
//! contract: position on a document, report presence, produce a comparable
//! value.
//!
//! Multi-valued encodings reduce each document's ascending value list to a
//! single value with a [`Selector`] while positioning, so the scan only ever
//! sees one value per document.

use crate::column::{
    BytesColumn, ColumnEncoding, DictionaryColumn, MultiDictionaryColumn, MultiNumericColumn,
    NumericColumn,
};
use crate::verify::Selector;
use crate::verify::policy::select;

/// Uniform view over a column for the sequential scan.
pub trait SortCursor {
    /// Comparable representation of one document's value.
    type Value: Ord + Clone;

    fn encoding(&self) -> ColumnEncoding;

    /// Move to `doc_id` and report whether the document has a value.
    /// Document IDs must be non-decreasing across calls.
    fn position_at(&mut self, doc_id: u64) -> bool;

    /// Value of the document last positioned on. Only meaningful after
    /// `position_at` returned `true`.
    fn current_value(&self) -> Self::Value;

    /// Human-readable rendering of a value.
    fn render(&self, value: &Self::Value) -> String;

    /// Extra detail about a violating pair, for verbose reports.
    fn violation_detail(&self, _prev: &Self::Value, _current: &Self::Value) -> Option<String> {
        None
    }
}

/// Render bytes as text when they are valid UTF-8, as hex otherwise.
pub fn render_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.escape_debug().to_string(),
        Err(_) => {
            let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
            format!("[{}]", hex.join(" "))
        }
    }
}

fn render_ord(lookup: Option<&[u8]>, ord: u64) -> String {
    match lookup {
        Some(term) => render_bytes(term),
        None => format!("<ord {ord}>"),
    }
}

/// Single signed integer per document.
pub struct NumericCursor<'a> {
    column: Box<dyn NumericColumn + 'a>,
}

impl<'a> NumericCursor<'a> {
    pub fn new(column: Box<dyn NumericColumn + 'a>) -> Self {
        Self { column }
    }
}

impl SortCursor for NumericCursor<'_> {
    type Value = i64;

    fn encoding(&self) -> ColumnEncoding {
        ColumnEncoding::Numeric
    }

    fn position_at(&mut self, doc_id: u64) -> bool {
        self.column.advance_exact(doc_id)
    }

    fn current_value(&self) -> i64 {
        self.column.long_value()
    }

    fn render(&self, value: &i64) -> String {
        value.to_string()
    }
}

/// Single dictionary ordinal per document, compared by ordinal.
pub struct DictionaryCursor<'a> {
    column: Box<dyn DictionaryColumn + 'a>,
}

impl<'a> DictionaryCursor<'a> {
    pub fn new(column: Box<dyn DictionaryColumn + 'a>) -> Self {
        Self { column }
    }
}

impl SortCursor for DictionaryCursor<'_> {
    type Value = u64;

    fn encoding(&self) -> ColumnEncoding {
        ColumnEncoding::Dictionary
    }

    fn position_at(&mut self, doc_id: u64) -> bool {
        self.column.advance_exact(doc_id)
    }

    fn current_value(&self) -> u64 {
        self.column.ord_value()
    }

    fn render(&self, ord: &u64) -> String {
        render_ord(self.column.lookup_ord(*ord), *ord)
    }
}

/// Ascending integer list per document, reduced by a selector.
pub struct MultiNumericCursor<'a> {
    column: Box<dyn MultiNumericColumn + 'a>,
    selector: Selector,
    current: Option<i64>,
}

impl<'a> MultiNumericCursor<'a> {
    pub fn new(column: Box<dyn MultiNumericColumn + 'a>, selector: Selector) -> Self {
        Self {
            column,
            selector,
            current: None,
        }
    }
}

impl SortCursor for MultiNumericCursor<'_> {
    type Value = i64;

    fn encoding(&self) -> ColumnEncoding {
        ColumnEncoding::MultiNumeric
    }

    fn position_at(&mut self, doc_id: u64) -> bool {
        self.current = if self.column.advance_exact(doc_id) {
            select(self.column.values(), self.selector)
        } else {
            None
        };
        self.current.is_some()
    }

    fn current_value(&self) -> i64 {
        self.current.unwrap_or_default()
    }

    fn render(&self, value: &i64) -> String {
        value.to_string()
    }
}

/// Ascending ordinal set per document, reduced by a selector.
pub struct MultiDictionaryCursor<'a> {
    column: Box<dyn MultiDictionaryColumn + 'a>,
    selector: Selector,
    current: Option<u64>,
}

impl<'a> MultiDictionaryCursor<'a> {
    pub fn new(column: Box<dyn MultiDictionaryColumn + 'a>, selector: Selector) -> Self {
        Self {
            column,
            selector,
            current: None,
        }
    }
}

impl SortCursor for MultiDictionaryCursor<'_> {
    type Value = u64;

    fn encoding(&self) -> ColumnEncoding {
        ColumnEncoding::MultiDictionary
    }

    fn position_at(&mut self, doc_id: u64) -> bool {
        self.current = if self.column.advance_exact(doc_id) {
            select(self.column.ords(), self.selector)
        } else {
            None
        };
        self.current.is_some()
    }

    fn current_value(&self) -> u64 {
        self.current.unwrap_or_default()
    }

    fn render(&self, ord: &u64) -> String {
        render_ord(self.column.lookup_ord(*ord), *ord)
    }
}

/// Opaque byte string per document, compared byte-wise.
pub struct BytesCursor<'a> {
    column: Box<dyn BytesColumn + 'a>,
}

impl<'a> BytesCursor<'a> {
    pub fn new(column: Box<dyn BytesColumn + 'a>) -> Self {
        Self { column }
    }
}

impl SortCursor for BytesCursor<'_> {
    type Value = Vec<u8>;

    fn encoding(&self) -> ColumnEncoding {
        ColumnEncoding::Bytes
    }

    fn position_at(&mut self, doc_id: u64) -> bool {
        self.column.advance_exact(doc_id)
    }

    // Copied: the accessor may reuse its buffer on the next document.
    fn current_value(&self) -> Vec<u8> {
        self.column.binary_value().to_vec()
    }

    fn render(&self, value: &Vec<u8>) -> String {
        render_bytes(value)
    }

    fn violation_detail(&self, prev: &Vec<u8>, current: &Vec<u8>) -> Option<String> {
        Some(format!(
            "prev bytes length={}, current bytes length={}",
            prev.len(),
            current.len()
        ))
    }
}
