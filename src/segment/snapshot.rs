//! JSON snapshots of in-memory indexes.
//!
//! A snapshot lists the segments of an index with their deletions, declared
//! sort and per-field columns:
//!
//! ```json
//! {
//!   "segments": [{
//!     "name": "seg_0",
//!     "max_doc": 3,
//!     "deleted": [1],
//!     "index_sort": [{"field": "year", "order": "asc"}],
//!     "fields": {
//!       "year": {"encoding": "numeric", "values": [1999, null, 2020]},
//!       "tags": {"encoding": "multi_dictionary", "values": [["a"], [], ["b", "c"]]},
//!       "body": {"encoding": "none"}
//!     }
//!   }]
//! }
//! ```
//!
//! Dictionary terms and bytes values are written as strings when they are
//! valid UTF-8 and as arrays of byte values otherwise, e.g. `[255, 0]`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::column::memory::ColumnData;
use crate::error::Result;
use crate::segment::IndexSort;
use crate::segment::SegmentReader;
use crate::segment::memory::{MemoryIndex, MemorySegment};

/// Serialized form of a [`MemoryIndex`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub segments: Vec<SegmentSnapshot>,
}

/// Serialized form of a [`MemorySegment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSnapshot {
    pub name: String,
    pub max_doc: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deleted: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_sort: Option<IndexSort>,
    #[serde(default)]
    pub fields: BTreeMap<String, ColumnSnapshot>,
}

/// Serialized column values, tagged by encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", content = "values", rename_all = "snake_case")]
pub enum ColumnSnapshot {
    /// Declared without per-document values.
    None,
    Numeric(Vec<Option<i64>>),
    Dictionary(Vec<Option<SnapshotBytes>>),
    MultiNumeric(Vec<Vec<i64>>),
    MultiDictionary(Vec<Vec<SnapshotBytes>>),
    Bytes(Vec<Option<SnapshotBytes>>),
    Vector(Vec<Option<Vec<f32>>>),
}

/// A byte string in a snapshot: text when valid UTF-8, raw bytes otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotBytes {
    Text(String),
    Raw(Vec<u8>),
}

impl From<&[u8]> for SnapshotBytes {
    fn from(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => SnapshotBytes::Text(text.to_string()),
            Err(_) => SnapshotBytes::Raw(bytes.to_vec()),
        }
    }
}

impl From<SnapshotBytes> for Vec<u8> {
    fn from(bytes: SnapshotBytes) -> Self {
        match bytes {
            SnapshotBytes::Text(text) => text.into_bytes(),
            SnapshotBytes::Raw(raw) => raw,
        }
    }
}

impl IndexSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: IndexSnapshot = serde_json::from_str(&content)?;
        log::debug!(
            "loaded snapshot {} with {} segment(s)",
            path.display(),
            snapshot.segments.len()
        );
        Ok(snapshot)
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_index(index: &MemoryIndex) -> Self {
        Self {
            segments: index.segments().iter().map(SegmentSnapshot::from_segment).collect(),
        }
    }

    pub fn into_index(self) -> Result<MemoryIndex> {
        let segments = self
            .segments
            .into_iter()
            .map(SegmentSnapshot::into_segment)
            .collect::<Result<Vec<_>>>()?;
        Ok(MemoryIndex::new(segments))
    }
}

impl SegmentSnapshot {
    pub fn from_segment(segment: &MemorySegment) -> Self {
        let fields = segment
            .field_names()
            .into_iter()
            .map(|name| {
                let column = segment
                    .column(name)
                    .map(ColumnSnapshot::from_data)
                    .unwrap_or(ColumnSnapshot::None);
                (name.to_string(), column)
            })
            .collect();

        Self {
            name: segment.name().to_string(),
            max_doc: segment.max_doc(),
            deleted: segment.deleted_docs(),
            index_sort: segment.index_sort().cloned(),
            fields,
        }
    }

    pub fn into_segment(self) -> Result<MemorySegment> {
        let mut builder = MemorySegment::builder(self.name, self.max_doc);
        for doc_id in self.deleted {
            builder = builder.delete(doc_id);
        }
        if let Some(sort) = self.index_sort {
            builder = builder.index_sort(sort);
        }
        for (name, column) in self.fields {
            builder = match column {
                ColumnSnapshot::None => builder.stored_only(name),
                ColumnSnapshot::Numeric(values) => builder.numeric(name, values),
                ColumnSnapshot::Dictionary(values) => builder.dictionary(name, values),
                ColumnSnapshot::MultiNumeric(values) => builder.multi_numeric(name, values),
                ColumnSnapshot::MultiDictionary(values) => builder.multi_dictionary(name, values),
                ColumnSnapshot::Bytes(values) => builder.bytes(name, values),
                ColumnSnapshot::Vector(values) => builder.vector(name, values),
            };
        }
        builder.build()
    }
}

impl ColumnSnapshot {
    fn from_data(data: &ColumnData) -> Self {
        match data {
            ColumnData::Numeric(values) => ColumnSnapshot::Numeric(values.clone()),
            ColumnData::Dictionary(data) => ColumnSnapshot::Dictionary(
                data.ords()
                    .iter()
                    .map(|ord| ord.map(|ord| term_bytes(data.terms(), ord)))
                    .collect(),
            ),
            ColumnData::MultiNumeric(values) => ColumnSnapshot::MultiNumeric(values.clone()),
            ColumnData::MultiDictionary(data) => ColumnSnapshot::MultiDictionary(
                data.ords()
                    .iter()
                    .map(|doc| doc.iter().map(|&ord| term_bytes(data.terms(), ord)).collect())
                    .collect(),
            ),
            ColumnData::Bytes(values) => ColumnSnapshot::Bytes(
                values
                    .iter()
                    .map(|v| v.as_deref().map(SnapshotBytes::from))
                    .collect(),
            ),
            ColumnData::Vector(values) => ColumnSnapshot::Vector(values.clone()),
        }
    }
}

// Ordinals are validated when the column is built.
fn term_bytes(terms: &[Vec<u8>], ord: u64) -> SnapshotBytes {
    terms
        .get(ord as usize)
        .map(|term| SnapshotBytes::from(term.as_slice()))
        .unwrap_or(SnapshotBytes::Raw(Vec::new()))
}

/// Load an index from a JSON snapshot file.
pub fn load_index(path: &Path) -> Result<MemoryIndex> {
    IndexSnapshot::load(path)?.into_index()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnEncoding;

    #[test]
    fn test_parse_snapshot() -> Result<()> {
        let json = r#"{
            "segments": [{
                "name": "seg_0",
                "max_doc": 3,
                "deleted": [1],
                "index_sort": [{"field": "year", "order": "asc"}],
                "fields": {
                    "year": {"encoding": "numeric", "values": [1999, null, 2020]},
                    "tags": {"encoding": "multi_dictionary", "values": [["a"], [], ["c", "b"]]},
                    "body": {"encoding": "none"}
                }
            }]
        }"#;
        let snapshot: IndexSnapshot = serde_json::from_str(json)?;
        let index = snapshot.into_index()?;
        let segment = &index.segments()[0];

        assert_eq!(segment.max_doc(), 3);
        assert!(!segment.is_live(1));
        assert_eq!(segment.index_sort().map(ToString::to_string), Some("year asc".to_string()));
        assert_eq!(
            segment.field_info("tags").and_then(|f| f.encoding),
            Some(ColumnEncoding::MultiDictionary)
        );
        assert_eq!(segment.field_info("body").and_then(|f| f.encoding), None);
        Ok(())
    }

    #[test]
    fn test_snapshot_bytes_forms() -> Result<()> {
        let json = r#"{"encoding": "bytes", "values": ["abc", [255, 0], null]}"#;
        let column: ColumnSnapshot = serde_json::from_str(json)?;
        assert_eq!(
            column,
            ColumnSnapshot::Bytes(vec![
                Some(SnapshotBytes::Text("abc".to_string())),
                Some(SnapshotBytes::Raw(vec![0xff, 0x00])),
                None,
            ])
        );

        assert_eq!(
            SnapshotBytes::from(&[0x80u8][..]),
            SnapshotBytes::Raw(vec![0x80])
        );
        assert_eq!(
            Vec::<u8>::from(SnapshotBytes::Text("é".to_string())),
            "é".as_bytes().to_vec()
        );
        assert_eq!(serde_json::to_string(&SnapshotBytes::Raw(vec![255]))?, "[255]");
        Ok(())
    }

    #[test]
    fn test_unknown_encoding_is_rejected() {
        let json = r#"{"segments": [{"name": "s", "max_doc": 1,
            "fields": {"f": {"encoding": "float", "values": [1.5]}}}]}"#;
        assert!(serde_json::from_str::<IndexSnapshot>(json).is_err());
    }
}
