//! Revenue extract (RPE) filter
//!
//! Narrows a raw RPE revenue extract to wireline service revenue. Every
//! column passes through in its original order; only `Month Date` is
//! rewritten as an ISO date once it has been validated.

use crate::columns;
use crate::data_loader::{CsvTable, DataLoader};
use crate::error::Result;
use csv::StringRecord;
use fieldroll_core::calendar::format_date;
use std::path::Path;
use tracing::info;

/// Sub business line code kept by the filter
pub const WIRELINE_SUB_BUSINESS_LINE: &str = "WLES";

/// GL account category kept by the filter
pub const SERVICE_REVENUE_CATEGORY: &str = "Service Revenue";

/// Row selection for an RPE extract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpeFilter {
    pub sub_business_line: String,
    pub gl_account_category: String,
}

impl Default for RpeFilter {
    fn default() -> Self {
        Self {
            sub_business_line: WIRELINE_SUB_BUSINESS_LINE.to_string(),
            gl_account_category: SERVICE_REVENUE_CATEGORY.to_string(),
        }
    }
}

/// Filtered extract, ready to be written
#[derive(Debug, Clone)]
pub struct RpeExtract {
    pub headers: StringRecord,
    pub rows: Vec<StringRecord>,
    /// Data rows read from the input
    pub read: usize,
}

impl RpeExtract {
    /// Rows dropped by the filter
    pub fn dropped(&self) -> usize {
        self.read - self.rows.len()
    }
}

impl RpeFilter {
    /// Read `path` and keep the rows that match the filter
    pub fn apply(&self, loader: &DataLoader, path: &Path) -> Result<RpeExtract> {
        let (mut reader, table) = DataLoader::open(path)?;
        let headers = reader.headers()?.clone();
        let month = table.require(columns::RPE_MONTH_DATE)?;
        let line = table.require(columns::RPE_SUB_BUSINESS_LINE)?;
        let category = table.require(columns::RPE_GL_ACCOUNT_CATEGORY)?;

        let mut read = 0usize;
        let rows = loader.read_rows(&mut reader, &table, "Reading revenue extract", |record| {
            read += 1;
            if CsvTable::cell(record, line) != Some(self.sub_business_line.as_str())
                || CsvTable::cell(record, category) != Some(self.gl_account_category.as_str())
            {
                return Ok(None);
            }
            normalize_month(&table, record, month).map(Some)
        })?;

        info!(
            "Kept {} of {} revenue rows ({} / {})",
            rows.len(),
            read,
            self.sub_business_line,
            self.gl_account_category
        );
        Ok(RpeExtract {
            headers,
            rows,
            read,
        })
    }
}

/// Copy a record with its month cell rewritten as an ISO date
fn normalize_month(table: &CsvTable, record: &StringRecord, month: usize) -> Result<StringRecord> {
    let date = table.timestamp(record, month, columns::RPE_MONTH_DATE)?.date();
    let formatted = format_date(&date);

    let mut out = StringRecord::with_capacity(record.as_slice().len(), record.len());
    for (idx, field) in record.iter().enumerate() {
        out.push_field(if idx == month { formatted.as_str() } else { field });
    }
    Ok(out)
}
