//! Output formatting for tmstat
//!
//! Two formatters share one interface:
//! - [`TableFormatter`] draws the progress-bar report and an invoice table
//! - [`JsonFormatter`] prints the same data as pretty JSON for scripting
//!
//! # Example
//!
//! ```no_run
//! use tmstat_terminal::output::get_formatter;
//! use tmstat_core::TimezoneConfig;
//! # fn snapshot() -> tmstat_core::UsageSnapshot { unimplemented!() }
//!
//! let formatter = get_formatter(false, 80, TimezoneConfig::utc(), false);
//! println!("{}", formatter.format_usage(&snapshot(), chrono::Utc::now()));
//! ```

use chrono::{DateTime, Utc};
use prettytable::{Cell, Row, Table, format};
use serde_json::{Value, json};
use tmstat_core::timezone::TimezoneConfig;
use tmstat_core::types::{InvoiceList, UsageSnapshot};

use crate::usage_report::{UsageReport, derive_allowances};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a usage snapshot as seen at `now`
    fn format_usage(&self, snapshot: &UsageSnapshot, now: DateTime<Utc>) -> String;

    /// Format the invoice history
    fn format_invoices(&self, invoices: &InvoiceList) -> String;
}

/// Human-readable terminal output
pub struct TableFormatter {
    report: UsageReport,
}

impl TableFormatter {
    pub fn new(report: UsageReport) -> Self {
        Self { report }
    }

    /// Render one JSON value as a table cell
    fn cell_text(value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => "-".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl OutputFormatter for TableFormatter {
    fn format_usage(&self, snapshot: &UsageSnapshot, now: DateTime<Utc>) -> String {
        self.report.render(snapshot, now)
    }

    fn format_invoices(&self, invoices: &InvoiceList) -> String {
        let Some(entries) = invoices.entries() else {
            return "No invoices found".to_string();
        };

        // Union of keys across all invoices
        let mut columns: Vec<&str> = Vec::new();
        for entry in &entries {
            for key in entry.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(Row::new(
            columns.iter().map(|c| Cell::new(c).style_spec("b")).collect(),
        ));

        for entry in &entries {
            table.add_row(Row::new(
                columns
                    .iter()
                    .map(|c| Cell::new(&Self::cell_text(entry.get(*c))))
                    .collect(),
            ));
        }

        table.to_string()
    }
}

/// Machine-readable JSON output
pub struct JsonFormatter {
    /// Zone whose wall clock the bill cycle days are counted on
    timezone: TimezoneConfig,
}

impl JsonFormatter {
    pub fn new(timezone: TimezoneConfig) -> Self {
        Self { timezone }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_usage(&self, snapshot: &UsageSnapshot, now: DateTime<Utc>) -> String {
        let rows: Vec<Value> = derive_allowances(snapshot, now, &self.timezone)
            .iter()
            .map(|allowance| {
                json!({
                    "name": allowance.name,
                    "used": allowance.used,
                    "total": allowance.total,
                    "percentage": allowance.percentage(),
                })
            })
            .collect();

        let output = json!({
            "usage": snapshot,
            "summary": rows,
            "generated_at": now.to_rfc3339(),
        });
        format!("{output:#}")
    }

    fn format_invoices(&self, invoices: &InvoiceList) -> String {
        format!("{:#}", json!(invoices))
    }
}

/// Pick the formatter for the requested output mode
pub fn get_formatter(
    json: bool,
    width: usize,
    timezone: TimezoneConfig,
    colored: bool,
) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter::new(timezone))
    } else {
        Box::new(TableFormatter::new(
            UsageReport::new(width, timezone).with_color(colored),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tmstat_core::types::{AllowanceQuota, AllowanceType};

    fn snapshot() -> UsageSnapshot {
        UsageSnapshot {
            subscriber_number: "07700900123".to_string(),
            tariff_description: "Pay Monthly".to_string(),
            bill_cycle_start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            bill_cycle_end: Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap(),
            allowances: vec![AllowanceQuota {
                allowance_type: AllowanceType::Texts,
                total: 100.0,
                remaining: 75.0,
            }],
        }
    }

    fn invoices(value: Value) -> InvoiceList {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_get_formatter() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();

        let json_output = get_formatter(true, 80, TimezoneConfig::utc(), false)
            .format_usage(&snapshot(), now);
        let parsed: Value = serde_json::from_str(&json_output).unwrap();
        assert_eq!(parsed["usage"]["tariff_description"], "Pay Monthly");
        assert_eq!(parsed["summary"][0]["name"], "Bill cycle");
        assert_eq!(parsed["summary"][0]["used"], 10.0);
        assert_eq!(parsed["summary"][1]["percentage"], 25.0);

        let table_output = get_formatter(false, 80, TimezoneConfig::utc(), false)
            .format_usage(&snapshot(), now);
        assert!(table_output.starts_with("Tesco Mobile - 07700900123 - Pay Monthly"));
        assert!(table_output.contains("25/100"));
    }

    #[test]
    fn test_json_summary_reports_overage() {
        let mut snapshot = snapshot();
        snapshot.allowances[0].remaining = -20.0;
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();

        let output = JsonFormatter::new(TimezoneConfig::utc()).format_usage(&snapshot, now);
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["summary"][1]["used"], 120.0);
        assert_eq!(parsed["summary"][1]["percentage"], 120.0);
    }

    #[test]
    fn test_invoice_table() {
        let formatter = get_formatter(false, 80, TimezoneConfig::utc(), false);
        let output = formatter.format_invoices(&invoices(json!({
            "invoices": [
                { "invoiceDate": "01/01/2024", "amount": 12.5 },
                { "invoiceDate": "01/02/2024", "amount": 14.0, "paid": true }
            ]
        })));

        assert!(output.contains("invoiceDate"));
        assert!(output.contains("amount"));
        assert!(output.contains("paid"));
        assert!(output.contains("01/02/2024"));
        assert!(output.contains("12.5"));
        assert!(output.contains("true"));
    }

    #[test]
    fn test_no_invoices() {
        let formatter = TableFormatter::new(UsageReport::new(80, TimezoneConfig::utc()));
        assert_eq!(
            formatter.format_invoices(&invoices(json!({ "invoices": [] }))),
            "No invoices found"
        );
        assert_eq!(
            formatter.format_invoices(&invoices(json!({}))),
            "No invoices found"
        );
    }

    #[test]
    fn test_json_invoices() {
        let output = JsonFormatter::new(TimezoneConfig::utc()).format_invoices(&invoices(json!({
            "count": 1,
            "invoices": [{ "amount": 9.99 }]
        })));
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["invoices"][0]["amount"], 9.99);
        assert_eq!(parsed["count"], 1);
        assert!(parsed["invoices"].get("invoices").is_none());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(TableFormatter::cell_text(None), "-");
        assert_eq!(TableFormatter::cell_text(Some(&Value::Null)), "-");
        assert_eq!(TableFormatter::cell_text(Some(&json!("text"))), "text");
        assert_eq!(TableFormatter::cell_text(Some(&json!(3))), "3");
        assert_eq!(TableFormatter::cell_text(Some(&json!(true))), "true");
    }
}
