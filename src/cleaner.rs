//! Missing-value cleaning for field tickets
//!
//! Grouping needs every key populated, so empty categorical cells become
//! the literal `"Unknown"` and empty numeric cells become 0. Cleaning runs
//! before allocation and aggregation.

use crate::columns;
use crate::types::{
    ActivityId, RawTicketRecord, TicketDimensions, TicketRecord, UNKNOWN,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Categorical columns filled with the placeholder when empty
pub const CATEGORICAL_COLUMNS: [&str; 16] = [
    columns::GEOUNIT_CODE,
    columns::COUNTRY_NAME,
    columns::JOB_GROUP_CODE,
    columns::JOB_TYPE_CODE,
    columns::ACTIVITY_ID,
    columns::BOOKING_STATUS,
    columns::FIELD_TICKET_ID,
    columns::WELL_NAME,
    columns::RIG_NAME,
    columns::RIG_TYPE,
    columns::WELL_TYPE,
    columns::WELL_OPERATING_ENVIRONMENT,
    columns::BILLING_ACCOUNT,
    columns::FIELD_TICKET_STATUS,
    columns::RIG_ENVIRONMENT,
    columns::WELL_GEOMETRY,
];

/// Numeric columns filled with zero when empty
pub const NUMERIC_COLUMNS: [&str; 1] = [columns::NET_VALUE_USD];

/// Count of cells filled per column
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleaningReport {
    pub filled: BTreeMap<&'static str, usize>,
}

impl CleaningReport {
    /// Total number of cells filled
    pub fn total(&self) -> usize {
        self.filled.values().sum()
    }

    fn text(&mut self, value: Option<String>, column: &'static str) -> String {
        value.unwrap_or_else(|| {
            *self.filled.entry(column).or_default() += 1;
            UNKNOWN.to_string()
        })
    }

    fn number(&mut self, value: Option<f64>, column: &'static str) -> f64 {
        value.unwrap_or_else(|| {
            *self.filled.entry(column).or_default() += 1;
            0.0
        })
    }
}

/// Clean raw tickets, discarding the fill counts
pub fn clean(tickets: Vec<RawTicketRecord>) -> Vec<TicketRecord> {
    clean_with_report(tickets).0
}

/// Clean raw tickets and report how many cells were filled per column
pub fn clean_with_report(tickets: Vec<RawTicketRecord>) -> (Vec<TicketRecord>, CleaningReport) {
    let mut report = CleaningReport::default();

    let cleaned: Vec<_> = tickets
        .into_iter()
        .map(|raw| clean_one(raw, &mut report))
        .collect();

    for (column, count) in &report.filled {
        debug!("Filled {} empty '{}' cells", count, column);
    }
    debug!(
        "Cleaned {} tickets, {} cells filled",
        cleaned.len(),
        report.total()
    );

    (cleaned, report)
}

fn clean_one(raw: RawTicketRecord, report: &mut CleaningReport) -> TicketRecord {
    TicketRecord {
        activity_id: ActivityId::new(report.text(raw.activity_id, columns::ACTIVITY_ID)),
        field_ticket_start_date: raw.field_ticket_start_date,
        field_ticket_end_date: raw.field_ticket_end_date,
        net_value_usd: report.number(raw.net_value_usd, columns::NET_VALUE_USD),
        dimensions: TicketDimensions {
            geounit_code: report.text(raw.geounit_code, columns::GEOUNIT_CODE),
            country_name: report.text(raw.country_name, columns::COUNTRY_NAME),
            job_group_code: report.text(raw.job_group_code, columns::JOB_GROUP_CODE),
            job_type_code: report.text(raw.job_type_code, columns::JOB_TYPE_CODE),
            billing_account: report.text(raw.billing_account, columns::BILLING_ACCOUNT),
            rig_name: report.text(raw.rig_name, columns::RIG_NAME),
            rig_type: report.text(raw.rig_type, columns::RIG_TYPE),
            rig_environment: report.text(raw.rig_environment, columns::RIG_ENVIRONMENT),
            well_type: report.text(raw.well_type, columns::WELL_TYPE),
            well_operating_environment: report.text(
                raw.well_operating_environment,
                columns::WELL_OPERATING_ENVIRONMENT,
            ),
        },
        well_name: report.text(raw.well_name, columns::WELL_NAME),
        booking_status: report.text(raw.booking_status, columns::BOOKING_STATUS),
        field_ticket_id: report.text(raw.field_ticket_id, columns::FIELD_TICKET_ID),
        field_ticket_status: report.text(raw.field_ticket_status, columns::FIELD_TICKET_STATUS),
        well_geometry: report.text(raw.well_geometry, columns::WELL_GEOMETRY),
    }
}
