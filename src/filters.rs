//! Filtering module for rollup rows
//!
//! Supports selecting rollup rows by geounit and reporting month, mainly to
//! spot-check the revenue of one slice of the rollup.
//!
//! # Examples
//!
//! ```
//! use fieldroll::filters::RollupFilter;
//!
//! // November 2019 revenue booked against the APG geounit
//! let filter = RollupFilter::new()
//!     .with_geounit("APG".to_string())
//!     .with_month(2019, 11);
//! assert!(!filter.is_empty());
//! ```

use crate::aggregation_types::MonthlyRollup;
use chrono::{Datelike, NaiveDate};

/// Filter configuration for rollup rows
///
/// All filters are optional and can be combined. An empty filter matches
/// every row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RollupFilter {
    /// Geounit code, compared exactly
    pub geounit: Option<String>,
    /// Reporting month (year and month)
    pub month: Option<(i32, u32)>,
}

impl RollupFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the geounit filter
    pub fn with_geounit(mut self, geounit: String) -> Self {
        self.geounit = Some(geounit);
        self
    }

    /// Set the reporting month filter
    pub fn with_month(mut self, year: i32, month: u32) -> Self {
        self.month = Some((year, month));
        self
    }

    /// Whether no restriction is set
    pub fn is_empty(&self) -> bool {
        self.geounit.is_none() && self.month.is_none()
    }

    /// Check if a reporting date falls in the month filter
    pub fn matches_date(&self, date: &NaiveDate) -> bool {
        match self.month {
            Some((year, month)) => date.year() == year && date.month() == month,
            None => true,
        }
    }

    /// Check if a rollup row passes the filter
    pub fn matches(&self, row: &MonthlyRollup) -> bool {
        if let Some(geounit) = &self.geounit {
            if &row.key.dimensions.geounit_code != geounit {
                return false;
            }
        }

        self.matches_date(&row.key.adjusted_date)
    }

    /// Sum of revenue over matching rows
    pub fn revenue(&self, rollups: &[MonthlyRollup]) -> f64 {
        rollups
            .iter()
            .filter(|row| self.matches(row))
            .map(|row| row.tickets_revenue)
            .sum()
    }

    /// Describe the filter for log lines
    pub fn describe(&self) -> String {
        let geounit = self.geounit.as_deref().unwrap_or("all geounits");
        match self.month {
            Some((year, month)) => format!("{geounit}, {year}-{month:02}"),
            None => format!("{geounit}, all months"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation_types::RollupKey;
    use crate::types::TicketDimensions;

    fn row(geounit: &str, year: i32, month: u32, revenue: f64) -> MonthlyRollup {
        MonthlyRollup {
            key: RollupKey {
                adjusted_date: NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
                dimensions: TicketDimensions {
                    geounit_code: geounit.to_string(),
                    country_name: "X".to_string(),
                    job_group_code: "X".to_string(),
                    job_type_code: "X".to_string(),
                    billing_account: "X".to_string(),
                    rig_name: "X".to_string(),
                    rig_type: "X".to_string(),
                    rig_environment: "X".to_string(),
                    well_type: "X".to_string(),
                    well_operating_environment: "X".to_string(),
                },
            },
            unique_well_count: 1,
            tickets_revenue: revenue,
            operating_days: 0.0,
            operating_cellmonth: 0.0,
        }
    }

    #[test]
    fn test_month_filter() {
        let filter = RollupFilter::new().with_month(2019, 11);

        assert!(!filter.matches_date(&NaiveDate::from_ymd_opt(2019, 10, 1).unwrap()));
        assert!(filter.matches_date(&NaiveDate::from_ymd_opt(2019, 11, 1).unwrap()));
        assert!(!filter.matches_date(&NaiveDate::from_ymd_opt(2020, 11, 1).unwrap()));
    }

    #[test]
    fn test_geounit_and_month_revenue() {
        let rollups = vec![
            row("APG", 2019, 11, 100.0),
            row("APG", 2019, 11, 25.5),
            row("APG", 2019, 12, 1000.0),
            row("NSA", 2019, 11, 7.0),
        ];

        let filter = RollupFilter::new()
            .with_geounit("APG".to_string())
            .with_month(2019, 11);
        assert_eq!(filter.revenue(&rollups), 125.5);

        let geounit_only = RollupFilter::new().with_geounit("APG".to_string());
        assert_eq!(geounit_only.revenue(&rollups), 1125.5);

        assert_eq!(RollupFilter::new().revenue(&rollups), 1132.5);
    }

    #[test]
    fn test_describe() {
        assert_eq!(RollupFilter::new().describe(), "all geounits, all months");
        assert_eq!(
            RollupFilter::new()
                .with_geounit("APG".to_string())
                .with_month(2019, 3)
                .describe(),
            "APG, 2019-03"
        );
    }
}
