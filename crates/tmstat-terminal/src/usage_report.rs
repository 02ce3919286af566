//! Usage report with ASCII progress bars
//!
//! Renders a [`UsageSnapshot`] as a fixed layout:
//!
//! ```text
//! Tesco Mobile - 07700900123 - 12 Month SIM Only
//! Bill cycle started      01/01/2024
//! Bill cycle ends         01/02/2024
//! Bill cycle                   14/31 [=================                     ]  45%
//! Minutes                    120/500 [=========                             ]  24%
//! ```
//!
//! Name, amount and percentage columns have fixed widths; the bar takes
//! whatever is left of the display width. An allowance used past its total
//! shows its real percentage (`120%`) over a full bar; a percentage wider
//! than its column pushes the row past the width. Rendering is pure: width,
//! clock and timezone are all passed in.

use chrono::{DateTime, NaiveDateTime, Utc};
use colored::*;
use tmstat_core::timezone::TimezoneConfig;
use tmstat_core::types::{AllowanceType, UsageSnapshot};
use tracing::debug;

/// Width of the allowance name column
pub const NAME_WIDTH: usize = 20;
/// Width of the `used/total` column
pub const AMOUNT_WIDTH: usize = 13;
/// Width of the percentage column
pub const PERCENT_WIDTH: usize = 4;
/// Width used when the terminal size is unknown
pub const DEFAULT_WIDTH: usize = 80;

const COLUMN_SEPARATORS: usize = 3;
const SECONDS_PER_DAY: i64 = 86_400;

/// Progress bar characters (ASCII)
const PROGRESS_FULL: &str = "=";
const PROGRESS_EMPTY: &str = " ";

/// Percentage from which a row is highlighted as running low
const WARNING_THRESHOLD: f64 = 80.0;
/// Percentage at which an allowance is used up
const EXHAUSTED_THRESHOLD: f64 = 100.0;

/// How an allowance's quantities are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Whole units, fraction truncated
    Integer,
    /// Pounds with two decimals
    Currency,
}

impl ValueFormat {
    pub fn for_type(allowance_type: &AllowanceType) -> Self {
        match allowance_type {
            AllowanceType::SafetyBuffer => Self::Currency,
            _ => Self::Integer,
        }
    }

    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Integer => format!("{}", value.trunc() as i64),
            Self::Currency => format!("£{value:.2}"),
        }
    }
}

/// One row of the report
#[derive(Debug, Clone, PartialEq)]
pub struct Allowance {
    pub name: String,
    pub total: f64,
    pub used: f64,
    pub format: ValueFormat,
    /// Whether the percentage stops at 100 (time-based rows)
    pub capped: bool,
}

impl Allowance {
    pub fn percentage(&self) -> f64 {
        let percentage = usage_percentage(self.used, self.total);
        if self.capped {
            percentage.min(EXHAUSTED_THRESHOLD)
        } else {
            percentage
        }
    }
}

/// `used / total` as a percentage, never negative
///
/// Overage is reported as is (120 for 120 of 100). A zero (or otherwise
/// unusable) total yields 0%.
pub fn usage_percentage(used: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    let percentage = used / total * 100.0;
    if percentage.is_finite() {
        percentage.max(0.0)
    } else {
        0.0
    }
}

/// Whole days between two wall-clock times, rounded down
pub fn whole_days(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Day counts of the current bill cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillCycle {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub days_total: i64,
    pub days_used: i64,
}

impl BillCycle {
    /// Day counts taken on the wall clock of `timezone`
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
        timezone: &TimezoneConfig,
    ) -> Self {
        let local_start = timezone.naive_local(start);
        Self {
            start,
            end,
            days_total: whole_days(local_start, timezone.naive_local(end)),
            days_used: whole_days(local_start, timezone.naive_local(now)),
        }
    }

    /// Elapsed share of the cycle, capped at 100
    pub fn percentage(&self) -> f64 {
        self.as_allowance().percentage()
    }

    pub fn as_allowance(&self) -> Allowance {
        Allowance {
            name: "Bill cycle".to_string(),
            total: self.days_total as f64,
            used: self.days_used as f64,
            format: ValueFormat::Integer,
            capped: true,
        }
    }
}

/// Report rows: the bill cycle first, then each displayable allowance in
/// the order the API sent them
pub fn derive_allowances(
    snapshot: &UsageSnapshot,
    now: DateTime<Utc>,
    timezone: &TimezoneConfig,
) -> Vec<Allowance> {
    let cycle = BillCycle::new(
        snapshot.bill_cycle_start,
        snapshot.bill_cycle_end,
        now,
        timezone,
    );
    let mut rows = vec![cycle.as_allowance()];

    for quota in &snapshot.allowances {
        let Some(name) = quota.allowance_type.display_name() else {
            debug!("Skipping allowance {:?}", quota.allowance_type);
            continue;
        };
        rows.push(Allowance {
            name: name.to_string(),
            total: quota.total,
            used: quota.used(),
            format: ValueFormat::for_type(&quota.allowance_type),
            capped: false,
        });
    }

    rows
}

/// Column widths for a display width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub name: usize,
    pub amount: usize,
    /// Bar column including its brackets
    pub bar: usize,
    pub percent: usize,
}

impl ColumnLayout {
    pub fn for_width(width: usize) -> Self {
        let fixed = NAME_WIDTH + AMOUNT_WIDTH + PERCENT_WIDTH + COLUMN_SEPARATORS;
        Self {
            name: NAME_WIDTH,
            amount: AMOUNT_WIDTH,
            // never narrower than the brackets
            bar: width.saturating_sub(fixed).max(2),
            percent: PERCENT_WIDTH,
        }
    }

    /// Cells between the brackets
    pub fn bar_inner(&self) -> usize {
        self.bar - 2
    }
}

/// `[===   ]` with `inner` cells, filled proportionally and rounded down
pub fn progress_bar(percentage: f64, inner: usize) -> String {
    let clamped = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((clamped / 100.0) * inner as f64).floor() as usize;
    let filled = filled.min(inner);
    format!(
        "[{}{}]",
        PROGRESS_FULL.repeat(filled),
        PROGRESS_EMPTY.repeat(inner - filled)
    )
}

/// Renders usage snapshots for the terminal
#[derive(Debug, Clone)]
pub struct UsageReport {
    width: usize,
    layout: ColumnLayout,
    timezone: TimezoneConfig,
    /// Whether to use colored output (respects NO_COLOR environment variable)
    colored_output: bool,
}

impl UsageReport {
    pub fn new(width: usize, timezone: TimezoneConfig) -> Self {
        Self {
            width,
            layout: ColumnLayout::for_width(width),
            timezone,
            colored_output: std::env::var("NO_COLOR").is_err(),
        }
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.colored_output = enabled;
        self
    }

    /// Full report for a snapshot as seen at `now`
    pub fn render(&self, snapshot: &UsageSnapshot, now: DateTime<Utc>) -> String {
        let mut lines = vec![
            self.title(snapshot),
            self.date_line("Bill cycle started", snapshot.bill_cycle_start),
            self.date_line("Bill cycle ends", snapshot.bill_cycle_end),
        ];
        lines.extend(
            derive_allowances(snapshot, now, &self.timezone)
                .iter()
                .map(|allowance| self.render_row(allowance)),
        );
        lines.join("\n")
    }

    /// A single `name  used/total [bar] pct%` line
    pub fn render_row(&self, allowance: &Allowance) -> String {
        let percentage = allowance.percentage();
        let amount = format!(
            "{}/{}",
            allowance.format.format(allowance.used),
            allowance.format.format(allowance.total)
        );
        let percent = format!(
            "{:>width$}",
            format!("{}%", percentage.trunc() as i64),
            width = self.layout.percent
        );

        format!(
            "{:<name$} {:>amount_width$} {} {}",
            allowance.name,
            amount,
            progress_bar(percentage, self.layout.bar_inner()),
            self.colorize(&percent, percentage),
            name = self.layout.name,
            amount_width = self.layout.amount,
        )
    }

    fn title(&self, snapshot: &UsageSnapshot) -> String {
        let title = format!(
            "Tesco Mobile - {} - {}",
            snapshot.subscriber_number, snapshot.tariff_description
        );
        console::truncate_str(&title, self.width.max(1), "...").into_owned()
    }

    fn date_line(&self, label: &str, date: DateTime<Utc>) -> String {
        format!(
            "{:<name$} {:>amount$}",
            label,
            self.timezone.format_bill_date(date),
            name = self.layout.name,
            amount = self.layout.amount,
        )
    }

    fn colorize(&self, text: &str, percentage: f64) -> String {
        if !self.colored_output {
            return text.to_string();
        }
        if percentage >= EXHAUSTED_THRESHOLD {
            text.red().to_string()
        } else if percentage >= WARNING_THRESHOLD {
            text.yellow().to_string()
        } else {
            text.green().to_string()
        }
    }
}

/// Get terminal width using the cross-platform terminal_size crate
pub fn terminal_width() -> Option<usize> {
    terminal_size::terminal_size().map(|(width, _)| width.0 as usize)
}
