//! Terminal output formatting for tmstat
//!
//! This crate turns usage snapshots and invoice lists into text: the
//! progress-bar usage report, an invoice table, and JSON output.

pub mod output;
pub mod usage_report;

pub use output::{JsonFormatter, OutputFormatter, TableFormatter, get_formatter};
pub use usage_report::{DEFAULT_WIDTH, UsageReport, terminal_width};
