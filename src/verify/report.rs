//! Human-readable and JSON reports of a verification outcome.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use crate::error::VerifyError;
use crate::segment::SegmentSummary;
use crate::verify::VerifyOutcome;

const MERGE_HINT: &str = "Hint: force-merge the index down to a single segment first";

/// Report rendering format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text lines.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

impl FromStr for OutputFormat {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(VerifyError::invalid_argument(format!(
                "unknown output format '{other}', expected text or json"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Formats a [`VerifyOutcome`].
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    outcome: &'a VerifyOutcome,
}

impl<'a> Report<'a> {
    pub fn new(outcome: &'a VerifyOutcome) -> Self {
        Self { outcome }
    }

    fn verbose(&self) -> bool {
        self.outcome.options.verbose
    }

    /// Segment metadata lines, present only in verbose mode.
    pub fn segment_lines(&self) -> Vec<String> {
        match (&self.outcome.segment, self.verbose()) {
            (Some(summary), true) => segment_lines(summary),
            _ => Vec::new(),
        }
    }

    /// Verdict lines: one line, plus a hint or verbose detail where relevant.
    pub fn result_lines(&self) -> Vec<String> {
        let options = &self.outcome.options;
        match &self.outcome.result {
            Ok(verification) => {
                let mut lines = vec![format!(
                    "OK: index is sorted by {} {}",
                    options.field, options.order
                )];
                if let (true, Some(terms)) = (self.verbose(), verification.dictionary_size) {
                    lines.push(format!("dictionary terms: {terms}"));
                }
                lines
            }
            Err(err @ VerifyError::SegmentCount { .. }) => {
                vec![format!("FAIL: {err}"), MERGE_HINT.to_string()]
            }
            Err(err @ VerifyError::Interrupted { .. }) => vec![format!("INCOMPLETE: {err}")],
            Err(err @ VerifyError::OrderViolation(violation)) => {
                let mut lines = vec![format!("FAIL: {err}")];
                if let (true, Some(detail)) = (self.verbose(), &violation.detail) {
                    lines.push(detail.clone());
                }
                lines
            }
            Err(err) => vec![format!("FAIL: {err}")],
        }
    }

    /// All text lines: verbose segment metadata first, then the verdict.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.segment_lines();
        lines.extend(self.result_lines());
        lines
    }

    pub fn to_json(&self) -> Value {
        let options = &self.outcome.options;
        let status = if self.outcome.is_pass() {
            "ok"
        } else if self.outcome.is_incomplete() {
            "incomplete"
        } else {
            "fail"
        };

        let mut report = json!({
            "status": status,
            "field": options.field,
            "order": options.order,
            "missing": options.missing,
            "selector": options.selector,
            "message": self.result_lines().first().cloned().unwrap_or_default(),
        });

        if let (Some(summary), true) = (&self.outcome.segment, self.verbose()) {
            report["segment"] = json!(summary);
        }

        match &self.outcome.result {
            Ok(verification) => {
                report["encoding"] = json!(verification.encoding);
                report["docs_checked"] = json!(verification.docs_checked);
                report["docs_with_value"] = json!(verification.docs_with_value);
                if let Some(terms) = verification.dictionary_size {
                    report["dictionary_size"] = json!(terms);
                }
            }
            Err(err) => {
                report["rule"] = json!(err.kind());
                match err {
                    VerifyError::MissingValue { doc_id, .. }
                    | VerifyError::Interrupted { doc_id } => {
                        report["doc_id"] = json!(doc_id);
                    }
                    VerifyError::MissingOrderViolation {
                        prev_doc_id,
                        doc_id,
                        ..
                    } => {
                        report["doc_id"] = json!(doc_id);
                        report["prev_doc_id"] = json!(prev_doc_id);
                    }
                    VerifyError::OrderViolation(violation) => {
                        report["doc_id"] = json!(violation.doc_id);
                        report["prev_doc_id"] = json!(violation.prev_doc_id);
                        report["prev_value"] = json!(violation.prev_value);
                        report["current_value"] = json!(violation.current_value);
                        if let Some(detail) = &violation.detail {
                            report["detail"] = json!(detail);
                        }
                    }
                    _ => {}
                }
            }
        }

        report
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => self.lines().join("\n"),
            OutputFormat::Json => {
                serde_json::to_string_pretty(&self.to_json()).unwrap_or_default()
            }
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

fn segment_lines(summary: &SegmentSummary) -> Vec<String> {
    vec![
        format!("segment: {}", summary.name),
        format!(
            "segment sort: {}",
            summary.index_sort.as_deref().unwrap_or("none")
        ),
        format!(
            "max_doc: {}, live: {}, deleted: {}",
            summary.max_doc, summary.live_docs, summary.deleted_docs
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::memory::{MemoryIndex, MemorySegment};
    use crate::segment::{IndexSort, SortField};
    use crate::verify::{SortOrder, SortVerifier, VerifyOptions};

    fn run(segment: MemorySegment, options: VerifyOptions) -> VerifyOutcome {
        SortVerifier::new(options).verify(&MemoryIndex::single(segment))
    }

    #[test]
    fn test_pass_line() {
        let segment = MemorySegment::builder("seg_0", 2)
            .numeric("year", vec![Some(2020), Some(2001)])
            .build()
            .unwrap();
        let options = VerifyOptions::builder("year").order(SortOrder::Descending).build();
        let outcome = run(segment, options);
        assert_eq!(
            Report::new(&outcome).to_string(),
            "OK: index is sorted by year desc"
        );
    }

    #[test]
    fn test_verbose_segment_block() {
        let segment = MemorySegment::builder("seg_0", 3)
            .numeric("year", vec![Some(1), Some(9), Some(2)])
            .index_sort(IndexSort::new(vec![SortField::new("year", SortOrder::Ascending)]))
            .delete(1)
            .build()
            .unwrap();
        let options = VerifyOptions::builder("year").verbose(true).build();
        let outcome = run(segment, options);
        assert_eq!(
            Report::new(&outcome).lines(),
            vec![
                "segment: seg_0".to_string(),
                "segment sort: year asc".to_string(),
                "max_doc: 3, live: 2, deleted: 1".to_string(),
                "OK: index is sorted by year asc".to_string(),
            ]
        );
    }

    #[test]
    fn test_segment_count_hint() {
        let outcome = SortVerifier::new(VerifyOptions::new("year")).verify(&MemoryIndex::new(vec![
            MemorySegment::builder("a", 0).build().unwrap(),
            MemorySegment::builder("b", 0).build().unwrap(),
        ]));
        let lines = Report::new(&outcome).lines();
        assert_eq!(lines[0], "FAIL: index must have exactly 1 segment; found 2");
        assert_eq!(lines[1], MERGE_HINT);
    }

    #[test]
    fn test_bytes_detail_only_in_verbose_mode() {
        let build = || {
            MemorySegment::builder("seg_0", 2)
                .bytes("key", vec![Some("b"), Some("a")])
                .build()
                .unwrap()
        };

        let quiet = run(build(), VerifyOptions::new("key"));
        assert_eq!(
            Report::new(&quiet).lines(),
            vec!["FAIL: order violated at doc 1 (prev doc 0 value=b, current value=a)".to_string()]
        );

        let verbose = run(build(), VerifyOptions::builder("key").verbose(true).build());
        let lines = Report::new(&verbose).lines();
        assert_eq!(
            lines.last().map(String::as_str),
            Some("prev bytes length=1, current bytes length=1")
        );
    }

    #[test]
    fn test_json_report_for_violation() {
        let segment = MemorySegment::builder("seg_0", 3)
            .dictionary("title", vec![Some("b"), Some("c"), Some("a")])
            .build()
            .unwrap();
        let outcome = run(segment, VerifyOptions::new("title"));
        let report = Report::new(&outcome).to_json();

        assert_eq!(report["status"], "fail");
        assert_eq!(report["rule"], "order_violation");
        assert_eq!(report["doc_id"], 2);
        assert_eq!(report["prev_doc_id"], 1);
        assert_eq!(report["prev_value"], "c");
        assert_eq!(report["current_value"], "a");
        assert_eq!(report["order"], "asc");
    }

    #[test]
    fn test_json_report_for_pass() {
        let segment = MemorySegment::builder("seg_0", 2)
            .numeric("year", vec![Some(1), None])
            .build()
            .unwrap();
        let options = VerifyOptions::builder("year")
            .missing(crate::verify::MissingPolicy::Last)
            .build();
        let outcome = run(segment, options);
        let report = Report::new(&outcome).to_json();

        assert_eq!(report["status"], "ok");
        assert_eq!(report["docs_checked"], 2);
        assert_eq!(report["docs_with_value"], 1);
        assert_eq!(report["missing"], "last");
        assert!(report.get("segment").is_none());
    }

    #[test]
    fn test_dictionary_size_in_reports() {
        let segment = MemorySegment::builder("seg_0", 3)
            .multi_dictionary("tags", vec![vec!["a", "b"], vec!["b"], vec!["c"]])
            .build()
            .unwrap();
        let options = VerifyOptions::builder("tags").verbose(true).build();
        let outcome = run(segment, options);

        let lines = Report::new(&outcome).result_lines();
        assert_eq!(lines[0], "OK: index is sorted by tags asc");
        assert_eq!(lines[1], "dictionary terms: 3");
        assert_eq!(Report::new(&outcome).to_json()["dictionary_size"], 3);
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
