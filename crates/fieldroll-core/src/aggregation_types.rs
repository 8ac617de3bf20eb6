//! Aggregation data types for fieldroll
//!
//! Pure data structures for the monthly rollup and the totals reported
//! alongside it. These types have no dependencies on the loaders or the
//! pipeline stages.

use crate::types::TicketDimensions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Grouping key of a monthly rollup row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RollupKey {
    /// First of the reporting month
    pub adjusted_date: NaiveDate,
    pub dimensions: TicketDimensions,
}

/// One row of the monthly rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRollup {
    pub key: RollupKey,
    /// Distinct well names in the group
    pub unique_well_count: usize,
    /// Sum of ticket net values in USD
    pub tickets_revenue: f64,
    /// Sum of allocated operating days
    pub operating_days: f64,
    /// Sum of allocated operating days as fractions of the month
    pub operating_cellmonth: f64,
}

/// Rollup rows folded into one reporting month, for summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// Reporting month in YYYY-MM format
    pub month: String,
    pub groups: usize,
    pub well_count: usize,
    pub tickets_revenue: f64,
    pub operating_days: f64,
    pub operating_cellmonth: f64,
}

/// Calculate totals from aggregated data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub groups: usize,
    pub tickets_revenue: f64,
    pub operating_days: f64,
    pub operating_cellmonth: f64,
}

impl Totals {
    pub fn from_rollups(rollups: &[MonthlyRollup]) -> Self {
        let mut totals = Self::default();
        for row in rollups {
            totals.groups += 1;
            totals.tickets_revenue += row.tickets_revenue;
            totals.operating_days += row.operating_days;
            totals.operating_cellmonth += row.operating_cellmonth;
        }
        totals
    }

    pub fn from_months(months: &[MonthSummary]) -> Self {
        let mut totals = Self::default();
        for month in months {
            totals.groups += month.groups;
            totals.tickets_revenue += month.tickets_revenue;
            totals.operating_days += month.operating_days;
            totals.operating_cellmonth += month.operating_cellmonth;
        }
        totals
    }
}
