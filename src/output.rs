//! Output module for fieldroll
//!
//! Two kinds of output live here:
//! - CSV renderers for the coalesced journal, the monthly rollup, the
//!   per-ticket detail and the filtered revenue extract, plus
//!   [`OutputSet`], which writes a run's files all together or not at all
//! - Summary formatters for the terminal, as tables or as JSON
//!
//! # Examples
//!
//! ```
//! use fieldroll::output::{get_formatter, render_rollups};
//!
//! let csv = render_rollups(&[]).unwrap();
//! assert!(String::from_utf8(csv).unwrap().starts_with("Adjusted Date,"));
//!
//! let formatter = get_formatter(true);
//! println!("{}", formatter.format_spot_check("APG, 2019-11", 1250.0));
//! ```

use crate::aggregation_types::{MonthSummary, MonthlyRollup, Totals};
use crate::columns;
use crate::error::{FieldrollError, Result};
use crate::pipeline::{JournalReport, RpeReport, RunReport};
use crate::rpe::RpeExtract;
use crate::types::{AllocatedTicket, CoalescedActivity};
use fieldroll_core::calendar::{format_date, format_timestamp};
use prettytable::{Cell, Row, Table, format, row};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Format an optional float measure; empty when absent
fn float_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:?}")).unwrap_or_default()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| FieldrollError::Io(e.into_error()))
}

/// Render the coalesced journal, sorted by activity id
pub fn render_coalesced(activities: &[CoalescedActivity]) -> Result<Vec<u8>> {
    let mut sorted: Vec<&CoalescedActivity> = activities.iter().collect();
    sorted.sort_by(|a, b| a.activity_id.cmp(&b.activity_id));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns::COALESCED_HEADER)?;
    for activity in sorted {
        writer.write_record([
            activity.geounit_code.clone(),
            activity.activity_id.to_string(),
            activity.value.to_string(),
            format_timestamp(&activity.oa_start),
            format_timestamp(&activity.oa_end),
        ])?;
    }
    finish(writer)
}

/// Render the monthly rollup in the order given
pub fn render_rollups(rollups: &[MonthlyRollup]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns::ROLLUP_HEADER)?;
    for row in rollups {
        let d = &row.key.dimensions;
        writer.write_record([
            format_date(&row.key.adjusted_date),
            d.geounit_code.clone(),
            d.country_name.clone(),
            d.job_group_code.clone(),
            d.job_type_code.clone(),
            d.billing_account.clone(),
            d.rig_name.clone(),
            d.rig_type.clone(),
            d.rig_environment.clone(),
            d.well_type.clone(),
            d.well_operating_environment.clone(),
            row.unique_well_count.to_string(),
            float_cell(Some(row.tickets_revenue)),
            float_cell(Some(row.operating_days)),
            float_cell(Some(row.operating_cellmonth)),
        ])?;
    }
    finish(writer)
}

/// Render one row per allocated ticket, in input order
pub fn render_allocated(tickets: &[AllocatedTicket]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns::ALLOCATED_HEADER)?;
    for allocated in tickets {
        let t = &allocated.ticket;
        let d = &t.dimensions;
        writer.write_record([
            t.field_ticket_id.clone(),
            t.activity_id.to_string(),
            format_timestamp(&t.field_ticket_start_date),
            format_timestamp(&t.field_ticket_end_date),
            float_cell(Some(t.net_value_usd)),
            d.geounit_code.clone(),
            d.country_name.clone(),
            d.job_group_code.clone(),
            d.job_type_code.clone(),
            d.billing_account.clone(),
            d.rig_name.clone(),
            d.rig_type.clone(),
            d.rig_environment.clone(),
            d.well_type.clone(),
            d.well_operating_environment.clone(),
            t.well_name.clone(),
            t.booking_status.clone(),
            t.field_ticket_status.clone(),
            t.well_geometry.clone(),
            format_date(&allocated.adjusted_date),
            float_cell(allocated.operating_days),
            float_cell(allocated.operating_cellmonth),
        ])?;
    }
    finish(writer)
}

/// Render a filtered revenue extract with its original header
pub fn render_rpe(extract: &RpeExtract) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(&extract.headers)?;
    for row in &extract.rows {
        writer.write_record(row)?;
    }
    finish(writer)
}

/// Rendered files of one run, written together
///
/// [`OutputSet::commit`] writes every file to a temporary sibling first and
/// renames them into place only once all of them were written, so a failed
/// run leaves previous outputs untouched.
#[derive(Debug, Default)]
pub struct OutputSet {
    files: Vec<(PathBuf, Vec<u8>)>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `contents` for `path`
    pub fn add(&mut self, path: impl Into<PathBuf>, contents: Vec<u8>) {
        self.files.push((path.into(), contents));
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every queued file and return their paths
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(self.files.len());

        for (path, contents) in &self.files {
            let tmp = temp_path(path);
            let written = ensure_parent(path).and_then(|()| fs::write(&tmp, contents));
            if let Err(e) = written {
                discard(&staged);
                let _ = fs::remove_file(&tmp);
                return Err(e.into());
            }
            debug!("Staged {} ({} bytes)", tmp.display(), contents.len());
            staged.push((tmp, path.clone()));
        }

        for (idx, (tmp, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp, path) {
                discard(&staged[idx..]);
                return Err(e.into());
            }
            info!("Wrote {}", path.display());
        }

        Ok(staged.into_iter().map(|(_, path)| path).collect())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        let _ = fs::remove_file(tmp);
    }
}

/// Trait for summary formatters
///
/// Implementations render the reports returned by the pipeline for the
/// terminal.
pub trait OutputFormatter {
    /// Format the result of coalescing the journal
    fn format_journal(&self, report: &JournalReport) -> String;

    /// Format the monthly summary of a tickets run
    fn format_run(&self, report: &RunReport) -> String;

    /// Format the revenue of one rollup slice
    fn format_spot_check(&self, description: &str, revenue: f64) -> String;

    /// Format the result of filtering a revenue extract
    fn format_rpe(&self, report: &RpeReport) -> String;
}

/// Table formatter for human-readable output
///
/// Numbers are formatted with thousands separators and revenue with a
/// dollar sign.
pub struct TableFormatter;

impl TableFormatter {
    /// Format a number with thousands separators
    fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    /// Format currency with dollar sign and thousands separators
    fn format_currency(amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let cents = (amount.abs() * 100.0).round() as u64;
        format!(
            "{sign}${}.{:02}",
            Self::format_number(cents / 100),
            cents % 100
        )
    }

    fn format_days(days: f64) -> String {
        format!("{days:.2}")
    }

    /// Create a totals row for tables
    fn format_totals_row(totals: &Totals, wells: usize) -> Row {
        row![
            b -> "TOTAL",
            br -> Self::format_number(totals.groups as u64),
            br -> Self::format_number(wells as u64),
            br -> Self::format_currency(totals.tickets_revenue),
            br -> Self::format_days(totals.operating_days),
            br -> Self::format_days(totals.operating_cellmonth)
        ]
    }

    fn format_months(months: &[MonthSummary], totals: &Totals) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        table.set_titles(row![
            b -> "Month",
            b -> "Groups",
            b -> "Wells",
            b -> "Revenue",
            b -> "Operating Days",
            b -> "Cell Months"
        ]);

        for month in months {
            table.add_row(row![
                month.month,
                r -> Self::format_number(month.groups as u64),
                r -> Self::format_number(month.well_count as u64),
                r -> Self::format_currency(month.tickets_revenue),
                r -> Self::format_days(month.operating_days),
                r -> Self::format_days(month.operating_cellmonth)
            ]);
        }

        table.add_row(Row::new(vec![Cell::new(""); 6]));
        let wells = months.iter().map(|m| m.well_count).sum();
        table.add_row(Self::format_totals_row(totals, wells));

        table.to_string()
    }
}

impl OutputFormatter for TableFormatter {
    fn format_journal(&self, report: &JournalReport) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Journal", b -> "Value"]);
        table.add_row(row!["Intervals", r -> Self::format_number(report.records as u64)]);
        table.add_row(row!["Activities", r -> Self::format_number(report.activities as u64)]);
        table.add_row(row!["Operating days", r -> report.operating_days]);
        table.add_row(row!["Merge rule", r -> report.merge_rule]);
        table.to_string()
    }

    fn format_run(&self, report: &RunReport) -> String {
        let mut output = String::new();
        if let Some(journal) = &report.journal {
            output.push_str(&self.format_journal(journal));
            output.push('\n');
        }

        output.push_str(&format!(
            "{} tickets, {} matched, {} unmatched, {} excluded, {} cells filled\n",
            Self::format_number(report.tickets as u64),
            Self::format_number(report.allocation.matched as u64),
            Self::format_number(report.allocation.unmatched as u64),
            Self::format_number(report.allocation.excluded as u64),
            Self::format_number(report.cells_filled as u64)
        ));

        if report.months.is_empty() {
            output.push_str("No tickets to summarize\n");
        } else {
            output.push_str(&Self::format_months(&report.months, &report.totals));
        }
        output
    }

    fn format_spot_check(&self, description: &str, revenue: f64) -> String {
        format!("Revenue ({description}): {}", Self::format_currency(revenue))
    }

    fn format_rpe(&self, report: &RpeReport) -> String {
        format!(
            "Kept {} of {} revenue rows",
            Self::format_number(report.kept as u64),
            Self::format_number(report.read as u64)
        )
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    fn journal_json(report: &JournalReport) -> serde_json::Value {
        json!({
            "intervals": report.records,
            "activities": report.activities,
            "operating_days": report.operating_days,
            "merge_rule": report.merge_rule.to_string(),
        })
    }

    fn pretty(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_journal(&self, report: &JournalReport) -> String {
        Self::pretty(&json!({ "journal": Self::journal_json(report) }))
    }

    fn format_run(&self, report: &RunReport) -> String {
        let output = json!({
            "journal": report.journal.as_ref().map(Self::journal_json),
            "tickets": {
                "count": report.tickets,
                "matched": report.allocation.matched,
                "unmatched": report.allocation.unmatched,
                "excluded": report.allocation.excluded,
                "cells_filled": report.cells_filled,
            },
            "monthly": report.months.iter().map(|m| json!({
                "month": m.month,
                "groups": m.groups,
                "well_count": m.well_count,
                "tickets_revenue": m.tickets_revenue,
                "operating_days": m.operating_days,
                "operating_cellmonth": m.operating_cellmonth,
            })).collect::<Vec<_>>(),
            "totals": {
                "groups": report.totals.groups,
                "tickets_revenue": report.totals.tickets_revenue,
                "operating_days": report.totals.operating_days,
                "operating_cellmonth": report.totals.operating_cellmonth,
            }
        });
        Self::pretty(&output)
    }

    fn format_spot_check(&self, description: &str, revenue: f64) -> String {
        Self::pretty(&json!({
            "spot_check": {
                "filter": description,
                "tickets_revenue": revenue,
            }
        }))
    }

    fn format_rpe(&self, report: &RpeReport) -> String {
        Self::pretty(&json!({
            "rpe": {
                "read": report.read,
                "kept": report.kept,
            }
        }))
    }
}

/// Get appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
