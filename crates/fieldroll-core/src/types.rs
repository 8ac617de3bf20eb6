//! Core domain types for fieldroll
//!
//! This module contains the records that flow through the pipeline: raw
//! journal intervals, coalesced activities, field tickets before and after
//! cleaning, and tickets enriched with their allocated operating days.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder written into empty categorical cells by the cleaner
pub const UNKNOWN: &str = "Unknown";

/// Strongly-typed activity identifier
///
/// One activity is one piece of equipment's logged operating activity. It
/// groups many journal intervals and many billing tickets.
///
/// # Examples
/// ```
/// use fieldroll_core::types::ActivityId;
///
/// let id = ActivityId::new("1004432");
/// assert_eq!(id.as_str(), "1004432");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    /// Create a new ActivityId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ActivityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One logged activity-time interval from the journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRecord {
    pub activity_id: ActivityId,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Site/region code, taken from the first record of each activity
    pub geounit_code: String,
}

/// Coalesced operating time for one activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalescedActivity {
    pub geounit_code: String,
    pub activity_id: ActivityId,
    /// Total elapsed days over all merged spans, both boundary dates inclusive
    pub value: i64,
    /// Start of the first interval after sorting by start time
    pub oa_start: NaiveDateTime,
    /// End of the last interval after sorting by start time
    pub oa_end: NaiveDateTime,
}

/// Categorical dimensions a ticket is rolled up by, excluding the month
///
/// Field order is the grouping order; the derived `Ord` keeps rollup output
/// sorted the same way on every run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketDimensions {
    pub geounit_code: String,
    pub country_name: String,
    pub job_group_code: String,
    pub job_type_code: String,
    pub billing_account: String,
    pub rig_name: String,
    pub rig_type: String,
    pub rig_environment: String,
    pub well_type: String,
    pub well_operating_environment: String,
}

/// Field ticket as read from the tickets file, before cleaning
///
/// Categorical cells and the net value may be empty. Dates are required and
/// already parsed by the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTicketRecord {
    pub activity_id: Option<String>,
    pub field_ticket_start_date: NaiveDateTime,
    pub field_ticket_end_date: NaiveDateTime,
    pub net_value_usd: Option<f64>,
    pub geounit_code: Option<String>,
    pub country_name: Option<String>,
    pub job_group_code: Option<String>,
    pub job_type_code: Option<String>,
    pub billing_account: Option<String>,
    pub rig_name: Option<String>,
    pub rig_type: Option<String>,
    pub rig_environment: Option<String>,
    pub well_type: Option<String>,
    pub well_operating_environment: Option<String>,
    pub well_name: Option<String>,
    pub booking_status: Option<String>,
    pub field_ticket_id: Option<String>,
    pub field_ticket_status: Option<String>,
    pub well_geometry: Option<String>,
}

/// Field ticket after cleaning: every categorical cell and the net value
/// are populated
#[derive(Debug, Clone, PartialEq)]
pub struct TicketRecord {
    pub activity_id: ActivityId,
    pub field_ticket_start_date: NaiveDateTime,
    pub field_ticket_end_date: NaiveDateTime,
    pub net_value_usd: f64,
    pub dimensions: TicketDimensions,
    pub well_name: String,
    pub booking_status: String,
    pub field_ticket_id: String,
    pub field_ticket_status: String,
    pub well_geometry: String,
}

/// Ticket enriched with its reporting month and allocated operating time
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatedTicket {
    pub ticket: TicketRecord,
    /// First of the reporting month the ticket is attributed to
    pub adjusted_date: NaiveDate,
    /// Share of the activity's coalesced days; `None` when the activity is
    /// absent from the journal
    pub operating_days: Option<f64>,
    /// `operating_days` over the number of days in the reporting month
    pub operating_cellmonth: Option<f64>,
}

impl AllocatedTicket {
    /// Whether the ticket found its activity in the coalesced journal
    pub fn is_matched(&self) -> bool {
        self.operating_days.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(geounit: &str, rig: &str) -> TicketDimensions {
        TicketDimensions {
            geounit_code: geounit.to_string(),
            country_name: "Norway".to_string(),
            job_group_code: "WL".to_string(),
            job_type_code: "OH".to_string(),
            billing_account: "ACME".to_string(),
            rig_name: rig.to_string(),
            rig_type: "Jackup".to_string(),
            rig_environment: "Offshore".to_string(),
            well_type: "Oil".to_string(),
            well_operating_environment: "Offshore".to_string(),
        }
    }

    #[test]
    fn test_activity_id_ordering() {
        let mut ids = vec![ActivityId::new("B"), ActivityId::new("A")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "A");
        assert_eq!(ids[1].to_string(), "B");
    }

    #[test]
    fn test_dimensions_order_by_geounit_first() {
        let a = dims("APG", "Zeta");
        let b = dims("NSA", "Alpha");
        assert!(a < b);
    }

    #[test]
    fn test_activity_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ActivityId::new("A-1")).unwrap();
        assert_eq!(json, "\"A-1\"");
    }
}
