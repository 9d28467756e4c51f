use std::path::PathBuf;

use clap::Parser;
use iris_verifysort::{MissingPolicy, OutputFormat, Selector, SortOrder, VerifyOptions};

/// Verifies the index has exactly 1 segment and is sorted by <field> in docID order.
#[derive(Parser, Debug)]
#[command(name = "verifysort", version, about)]
pub struct Cli {
    /// Path to the index snapshot (JSON).
    #[arg(long, env = "VERIFYSORT_INDEX")]
    pub index: PathBuf,

    /// Doc values field to verify sorting for.
    #[arg(short, long)]
    pub field: String,

    /// Sort order: asc, desc.
    #[arg(short, long, default_value = "asc")]
    pub order: SortOrder,

    /// How to handle missing values: fail, first, last.
    #[arg(long, default_value = "fail")]
    pub missing: MissingPolicy,

    /// Selector for multi-valued doc values: min, max.
    #[arg(long, default_value = "min")]
    pub selector: Selector,

    /// Print extra details.
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format: text, json.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

impl Cli {
    pub fn options(&self) -> VerifyOptions {
        VerifyOptions::builder(self.field.clone())
            .order(self.order)
            .missing(self.missing)
            .selector(self.selector)
            .verbose(self.verbose)
            .build()
    }
}
