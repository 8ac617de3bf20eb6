//! Data loader module for reading the journal and ticket tables
//!
//! Tables are CSV files with a header row. Columns are looked up by name, so
//! column order does not matter and extra columns are ignored. A missing
//! required column or an unparsable cell aborts the load with the file,
//! line and column of the problem.
//!
//! # Examples
//!
//! ```no_run
//! use fieldroll::data_loader::DataLoader;
//! use std::path::Path;
//!
//! # fn example() -> fieldroll::Result<()> {
//! let loader = DataLoader::new();
//! let journal = loader.load_journal(Path::new("raw_data/global_journal_operatingtime.csv"))?;
//! println!("Loaded {} journal intervals", journal.len());
//! # Ok(())
//! # }
//! ```

use crate::columns;
use crate::error::{FieldrollError, Result};
use crate::types::{ActivityId, CoalescedActivity, JournalRecord, RawTicketRecord};
use chrono::NaiveDateTime;
use csv::StringRecord;
use fieldroll_core::calendar::parse_timestamp;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Cell contents treated the same as an empty cell
const MISSING_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// Header lookup for one CSV file
///
/// Resolves column names to indices and parses cells with file, line and
/// column context attached to every error.
pub(crate) struct CsvTable {
    file: PathBuf,
    columns: HashMap<String, usize>,
}

impl CsvTable {
    pub(crate) fn new(file: &Path, headers: &StringRecord) -> Self {
        let mut columns = HashMap::new();
        for (idx, name) in headers.iter().enumerate() {
            // First occurrence wins for duplicated header names
            columns
                .entry(name.trim().trim_start_matches('\u{feff}').to_string())
                .or_insert(idx);
        }
        Self {
            file: file.to_path_buf(),
            columns,
        }
    }

    pub(crate) fn file(&self) -> &Path {
        &self.file
    }

    /// Index of a column that must be present
    pub(crate) fn require(&self, column: &str) -> Result<usize> {
        self.columns
            .get(column)
            .copied()
            .ok_or_else(|| FieldrollError::MissingColumn {
                file: self.file.clone(),
                column: column.to_string(),
            })
    }

    /// Index of a column that may be absent
    pub(crate) fn optional(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    /// Trimmed cell content, `None` when empty or a missing-value marker
    pub(crate) fn cell<'r>(record: &'r StringRecord, idx: usize) -> Option<&'r str> {
        record
            .get(idx)
            .map(str::trim)
            .filter(|value| !value.is_empty() && !MISSING_MARKERS.contains(value))
    }

    fn line(record: &StringRecord) -> u64 {
        record.position().map(|pos| pos.line()).unwrap_or_default()
    }

    pub(crate) fn text(record: &StringRecord, idx: Option<usize>) -> Option<String> {
        idx.and_then(|i| Self::cell(record, i)).map(str::to_string)
    }

    pub(crate) fn required_text(
        &self,
        record: &StringRecord,
        idx: usize,
        column: &str,
    ) -> Result<String> {
        Self::cell(record, idx)
            .map(str::to_string)
            .ok_or_else(|| FieldrollError::MissingValue {
                file: self.file.clone(),
                line: Self::line(record),
                column: column.to_string(),
            })
    }

    pub(crate) fn timestamp(
        &self,
        record: &StringRecord,
        idx: usize,
        column: &str,
    ) -> Result<NaiveDateTime> {
        let raw = self.required_text(record, idx, column)?;
        parse_timestamp(&raw).ok_or_else(|| FieldrollError::InvalidDate {
            file: self.file.clone(),
            line: Self::line(record),
            column: column.to_string(),
            value: raw,
        })
    }

    fn optional_number(
        &self,
        record: &StringRecord,
        idx: usize,
        column: &str,
    ) -> Result<Option<f64>> {
        match Self::cell(record, idx) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|value| !value.is_nan())
                .map(Some)
                .ok_or_else(|| FieldrollError::InvalidNumber {
                    file: self.file.clone(),
                    line: Self::line(record),
                    column: column.to_string(),
                    value: raw.to_string(),
                }),
        }
    }

    fn integer(&self, record: &StringRecord, idx: usize, column: &str) -> Result<i64> {
        let raw = self.required_text(record, idx, column)?;
        let invalid = || FieldrollError::InvalidNumber {
            file: self.file.clone(),
            line: Self::line(record),
            column: column.to_string(),
            value: raw.clone(),
        };

        if let Ok(value) = raw.parse::<i64>() {
            return Ok(value);
        }
        // Whole numbers written with a trailing ".0"
        match raw.parse::<f64>() {
            Ok(value) if value.fract() == 0.0 && value.is_finite() => Ok(value as i64),
            _ => Err(invalid()),
        }
    }
}

/// Loader for the pipeline's tabular inputs
#[derive(Debug, Default, Clone)]
pub struct DataLoader {
    show_progress: bool,
}

impl DataLoader {
    /// Create a new DataLoader
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable progress spinners
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}] {pos} rows read")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    }

    /// Open a CSV file and resolve its header row
    pub(crate) fn open(path: &Path) -> Result<(csv::Reader<std::fs::File>, CsvTable)> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        let table = CsvTable::new(path, reader.headers()?);
        debug!("Opened {}", path.display());
        Ok((reader, table))
    }

    /// Read every remaining record, converting each with `convert`
    pub(crate) fn read_rows<T>(
        &self,
        reader: &mut csv::Reader<std::fs::File>,
        table: &CsvTable,
        message: &str,
        mut convert: impl FnMut(&StringRecord) -> Result<Option<T>>,
    ) -> Result<Vec<T>> {
        let progress = self.spinner(message);
        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        let mut count = 0u64;

        while reader.read_record(&mut record)? {
            if let Some(row) = convert(&record)? {
                rows.push(row);
            }
            count += 1;
            if let Some(ref pb) = progress {
                pb.set_position(count);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Read {count} rows"));
        }
        debug!("Read {} rows from {}", count, table.file().display());

        Ok(rows)
    }

    /// Load raw journal intervals
    ///
    /// Rows without an activity id cannot be grouped and are skipped with a
    /// warning. Start and end times are required on every other row.
    pub fn load_journal(&self, path: &Path) -> Result<Vec<JournalRecord>> {
        let (mut reader, table) = Self::open(path)?;
        let start = table.require(columns::JOURNAL_START)?;
        let end = table.require(columns::JOURNAL_END)?;
        let activity = table.require(columns::ACTIVITY_ID)?;
        let geounit = table.require(columns::GEOUNIT_CODE)?;

        let mut skipped = 0usize;
        let records = self.read_rows(&mut reader, &table, "Reading journal", |record| {
            let Some(activity_id) = CsvTable::cell(record, activity) else {
                skipped += 1;
                return Ok(None);
            };
            Ok(Some(JournalRecord {
                activity_id: ActivityId::new(activity_id),
                start_time: table.timestamp(record, start, columns::JOURNAL_START)?,
                end_time: table.timestamp(record, end, columns::JOURNAL_END)?,
                geounit_code: CsvTable::text(record, Some(geounit)).unwrap_or_default(),
            }))
        })?;

        if skipped > 0 {
            warn!(
                "Skipped {} journal rows without an {}",
                skipped,
                columns::ACTIVITY_ID
            );
        }
        Ok(records)
    }

    /// Load a previously written coalesced journal table
    pub fn load_coalesced(&self, path: &Path) -> Result<Vec<CoalescedActivity>> {
        let (mut reader, table) = Self::open(path)?;
        let geounit = table.require(columns::COALESCED_GEOUNIT)?;
        let activity = table.require(columns::ACTIVITY_ID)?;
        let value = table.require(columns::COALESCED_VALUE)?;
        let oa_start = table.require(columns::OA_START)?;
        let oa_end = table.require(columns::OA_END)?;

        self.read_rows(&mut reader, &table, "Reading coalesced journal", |record| {
            Ok(Some(CoalescedActivity {
                geounit_code: CsvTable::text(record, Some(geounit)).unwrap_or_default(),
                activity_id: ActivityId::new(table.required_text(
                    record,
                    activity,
                    columns::ACTIVITY_ID,
                )?),
                value: table.integer(record, value, columns::COALESCED_VALUE)?,
                oa_start: table.timestamp(record, oa_start, columns::OA_START)?,
                oa_end: table.timestamp(record, oa_end, columns::OA_END)?,
            }))
        })
    }

    /// Load raw field tickets
    ///
    /// Categorical cells and the net value may be empty; the cleaner fills
    /// them. Both ticket dates are required.
    pub fn load_tickets(&self, path: &Path) -> Result<Vec<RawTicketRecord>> {
        let (mut reader, table) = Self::open(path)?;
        let start = table.require(columns::TICKET_START)?;
        let end = table.require(columns::TICKET_END)?;
        let activity = table.require(columns::ACTIVITY_ID)?;
        let net_value = table.require(columns::NET_VALUE_USD)?;
        let well_name = table.require(columns::WELL_NAME)?;
        let mut dims = [0usize; 10];
        for (slot, column) in dims.iter_mut().zip(columns::DIMENSION_COLUMNS) {
            *slot = table.require(column)?;
        }
        let booking_status = table.optional(columns::BOOKING_STATUS);
        let field_ticket_id = table.optional(columns::FIELD_TICKET_ID);
        let field_ticket_status = table.optional(columns::FIELD_TICKET_STATUS);
        let well_geometry = table.optional(columns::WELL_GEOMETRY);

        self.read_rows(&mut reader, &table, "Reading tickets", |record| {
            let dim = |i: usize| CsvTable::text(record, Some(dims[i]));
            Ok(Some(RawTicketRecord {
                activity_id: CsvTable::text(record, Some(activity)),
                field_ticket_start_date: table.timestamp(record, start, columns::TICKET_START)?,
                field_ticket_end_date: table.timestamp(record, end, columns::TICKET_END)?,
                net_value_usd: table.optional_number(record, net_value, columns::NET_VALUE_USD)?,
                geounit_code: dim(0),
                country_name: dim(1),
                job_group_code: dim(2),
                job_type_code: dim(3),
                billing_account: dim(4),
                rig_name: dim(5),
                rig_type: dim(6),
                rig_environment: dim(7),
                well_type: dim(8),
                well_operating_environment: dim(9),
                well_name: CsvTable::text(record, Some(well_name)),
                booking_status: CsvTable::text(record, booking_status),
                field_ticket_id: CsvTable::text(record, field_ticket_id),
                field_ticket_status: CsvTable::text(record, field_ticket_status),
                well_geometry: CsvTable::text(record, well_geometry),
            }))
        })
    }
}
