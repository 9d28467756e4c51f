//! The sequential scan.
//!
//! Live documents are visited once in increasing docID order. Each one is
//! compared with the most recent live document before it; dead documents
//! are skipped and never become the reference. The first violation ends
//! the scan.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::column::{ColumnEncoding, DictionaryColumn, MultiDictionaryColumn};
use crate::error::{OrderViolation, Result, VerifyError};
use crate::segment::{IndexReader, SegmentReader, SegmentSummary};
use crate::verify::VerifyOptions;
use crate::verify::cursor::{
    BytesCursor, DictionaryCursor, MultiDictionaryCursor, MultiNumericCursor, NumericCursor,
    SortCursor,
};
use crate::verify::policy::{missing_transition_allowed, order_holds};
use crate::verify::{MissingPolicy, Selector, SortOrder};

/// Statistics of a passing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub field: String,
    pub encoding: ColumnEncoding,
    pub order: SortOrder,
    /// Selector applied, for multi-valued encodings only.
    pub selector: Option<Selector>,
    /// Number of distinct terms, for dictionary encodings only.
    pub dictionary_size: Option<u64>,
    /// Live documents visited.
    pub docs_checked: u64,
    /// Live documents that had a value.
    pub docs_with_value: u64,
}

impl Verification {
    fn with_dictionary_size(mut self, terms: u64) -> Self {
        self.dictionary_size = Some(terms);
        self
    }
}

/// Everything a single run produced.
#[derive(Debug)]
pub struct VerifyOutcome {
    pub options: VerifyOptions,
    /// Metadata of the verified segment, when the index had exactly one.
    pub segment: Option<SegmentSummary>,
    pub result: Result<Verification>,
}

impl VerifyOutcome {
    pub fn is_pass(&self) -> bool {
        self.result.is_ok()
    }

    /// Interrupted before a verdict was reached.
    pub fn is_incomplete(&self) -> bool {
        matches!(&self.result, Err(err) if err.is_incomplete())
    }

    /// Process exit status: 0 on pass, 2 when incomplete, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_pass() {
            0
        } else if self.is_incomplete() {
            2
        } else {
            1
        }
    }
}

/// Verifies that a single-segment index is sorted by one column.
#[derive(Debug, Clone)]
pub struct SortVerifier {
    options: VerifyOptions,
    interrupt: Option<Arc<AtomicBool>>,
}

impl SortVerifier {
    pub fn new(options: VerifyOptions) -> Self {
        Self {
            options,
            interrupt: None,
        }
    }

    /// Stop the scan between documents once `flag` is set. The run then
    /// ends with [`VerifyError::Interrupted`].
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Verify an index. The index must consist of exactly one segment.
    pub fn verify(&self, index: &dyn IndexReader) -> VerifyOutcome {
        let mut segment_summary = None;
        let result = single_segment(index).and_then(|segment| {
            segment_summary = Some(SegmentSummary::of(segment));
            self.verify_segment(segment)
        });

        match &result {
            Ok(verification) => log::info!(
                "index is sorted by {} {} ({} live docs checked)",
                verification.field,
                verification.order,
                verification.docs_checked
            ),
            Err(err) => log::warn!("sort verification failed: {err}"),
        }

        VerifyOutcome {
            options: self.options.clone(),
            segment: segment_summary,
            result,
        }
    }

    /// Verify one segment directly, skipping the segment count check.
    pub fn verify_segment(&self, segment: &dyn SegmentReader) -> Result<Verification> {
        let field = self.options.field.as_str();
        let info = segment
            .field_info(field)
            .ok_or_else(|| VerifyError::FieldNotFound {
                field: field.to_string(),
            })?;
        let encoding = info.encoding.ok_or_else(|| VerifyError::NoDocValues {
            field: field.to_string(),
        })?;

        log::debug!(
            "verifying {} column '{field}' of segment {} \
             ({} docs, order={}, missing={}, selector={})",
            encoding,
            segment.name(),
            segment.max_doc(),
            self.options.order,
            self.options.missing,
            self.options.selector
        );

        let selector = self.options.selector;
        let load_error = |source: VerifyError| VerifyError::AccessorLoad {
            field: field.to_string(),
            encoding,
            source: Box::new(source),
        };

        match encoding {
            ColumnEncoding::Numeric => {
                let column = segment.numeric_column(field).map_err(load_error)?;
                self.scan(segment, NumericCursor::new(column))
            }
            ColumnEncoding::Dictionary => {
                let column = segment.dictionary_column(field).map_err(load_error)?;
                let terms = column.value_count();
                self.scan(segment, DictionaryCursor::new(column))
                    .map(|v| v.with_dictionary_size(terms))
            }
            ColumnEncoding::MultiNumeric => {
                let column = segment.multi_numeric_column(field).map_err(load_error)?;
                self.scan(segment, MultiNumericCursor::new(column, selector))
            }
            ColumnEncoding::MultiDictionary => {
                let column = segment.multi_dictionary_column(field).map_err(load_error)?;
                let terms = column.value_count();
                self.scan(segment, MultiDictionaryCursor::new(column, selector))
                    .map(|v| v.with_dictionary_size(terms))
            }
            ColumnEncoding::Bytes => {
                let column = segment.bytes_column(field).map_err(load_error)?;
                self.scan(segment, BytesCursor::new(column))
            }
            ColumnEncoding::Vector => Err(VerifyError::UnsupportedEncoding {
                field: field.to_string(),
                encoding,
            }),
        }
    }

    fn scan<C: SortCursor>(
        &self,
        segment: &dyn SegmentReader,
        mut cursor: C,
    ) -> Result<Verification> {
        let state = (0..segment.max_doc())
            .filter(|&doc_id| {
                let live = segment.is_live(doc_id);
                if !live {
                    log::trace!("skipping deleted doc {doc_id}");
                }
                live
            })
            .try_fold(ScanState::new(), |state, doc_id| {
                self.step(&mut cursor, state, doc_id)
            })?;

        let encoding = cursor.encoding();
        Ok(Verification {
            field: self.options.field.clone(),
            encoding,
            order: self.options.order,
            selector: encoding.is_multi_valued().then_some(self.options.selector),
            dictionary_size: None,
            docs_checked: state.docs_checked,
            docs_with_value: state.docs_with_value,
        })
    }

    fn step<C: SortCursor>(
        &self,
        cursor: &mut C,
        state: ScanState<C::Value>,
        doc_id: u64,
    ) -> Result<ScanState<C::Value>> {
        if self.is_interrupted() {
            return Err(VerifyError::Interrupted { doc_id });
        }

        let field = &self.options.field;
        let has = cursor.position_at(doc_id);
        if !has && self.options.missing == MissingPolicy::Fail {
            return Err(VerifyError::MissingValue {
                field: field.clone(),
                doc_id,
            });
        }
        let value = has.then(|| cursor.current_value());

        if let Some(prev) = &state.prev {
            if !missing_transition_allowed(prev.value.is_some(), has, self.options.missing) {
                return Err(VerifyError::MissingOrderViolation {
                    field: field.clone(),
                    prev_doc_id: prev.doc_id,
                    doc_id,
                });
            }
            if let (Some(prev_value), Some(current_value)) = (&prev.value, &value) {
                if !order_holds(prev_value, current_value, self.options.order) {
                    return Err(VerifyError::OrderViolation(Box::new(OrderViolation {
                        field: field.clone(),
                        prev_doc_id: prev.doc_id,
                        doc_id,
                        prev_value: cursor.render(prev_value),
                        current_value: cursor.render(current_value),
                        detail: cursor.violation_detail(prev_value, current_value),
                    })));
                }
            }
        }

        Ok(ScanState {
            prev: Some(Previous { doc_id, value }),
            docs_checked: state.docs_checked + 1,
            docs_with_value: state.docs_with_value + u64::from(has),
        })
    }

    fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

fn single_segment(index: &dyn IndexReader) -> Result<&dyn SegmentReader> {
    let found = index.segment_count();
    if found != 1 {
        return Err(VerifyError::SegmentCount { found });
    }
    index.segment(0).ok_or(VerifyError::SegmentCount { found: 0 })
}

/// The most recent live document.
struct Previous<V> {
    doc_id: u64,
    /// `None` when the document had no value.
    value: Option<V>,
}

/// Accumulator threaded through the scan.
struct ScanState<V> {
    prev: Option<Previous<V>>,
    docs_checked: u64,
    docs_with_value: u64,
}

impl<V> ScanState<V> {
    fn new() -> Self {
        Self {
            prev: None,
            docs_checked: 0,
            docs_with_value: 0,
        }
    }
}
