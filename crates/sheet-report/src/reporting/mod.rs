//! Report document assembly and output.
//!
//! [`ReportGenerator`] runs preprocessing and section rendering and packages
//! the result as a [`ReportDocument`], suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Plain text output for terminals
//!
//! # Example
//!
//! ```rust,ignore
//! use sheet_report::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build("sales.csv", &raw_table, None, &config, None)?;
//! println!("{}", report.to_plain_text());
//!
//! let generator = ReportGenerator::new(PathBuf::from("output"));
//! generator.write_report_to_file(&report, "sales")?;
//! ```

mod generator;

pub use generator::{ColumnSummary, ReportDocument, ReportGenerator};
