use iris_verifysort::segment::SegmentSummary;
use iris_verifysort::{OutputFormat, Report, VerifyOutcome};
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Print the report for a verification run.
pub fn print_outcome(outcome: &VerifyOutcome, format: OutputFormat) {
    let report = Report::new(outcome);
    match format {
        OutputFormat::Json => println!("{}", report.render(OutputFormat::Json)),
        OutputFormat::Text => {
            if outcome.options.verbose {
                if let Some(summary) = &outcome.segment {
                    println!("{}", segment_table(summary));
                }
            }
            for line in report.result_lines() {
                println!("{line}");
            }
        }
    }
}

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "Segment")]
    name: String,
    #[tabled(rename = "Max Doc")]
    max_doc: u64,
    #[tabled(rename = "Live")]
    live_docs: u64,
    #[tabled(rename = "Deleted")]
    deleted_docs: u64,
    #[tabled(rename = "Sort")]
    index_sort: String,
}

fn segment_table(summary: &SegmentSummary) -> String {
    let rows = [SegmentRow {
        name: summary.name.clone(),
        max_doc: summary.max_doc,
        live_docs: summary.live_docs,
        deleted_docs: summary.deleted_docs,
        index_sort: summary
            .index_sort
            .clone()
            .unwrap_or_else(|| "none".to_string()),
    }];
    Table::new(rows).with(Style::rounded()).to_string()
}
