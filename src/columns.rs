//! Column names of the input and output tables
//!
//! Header names are part of the file contract and must match exactly.

// Journal input
pub const JOURNAL_START: &str = "Journal Activity start time";
pub const JOURNAL_END: &str = "Journal Activity end time";
pub const ACTIVITY_ID: &str = "Activity ID";
pub const GEOUNIT_CODE: &str = "Sl Geounit (Code)";

// Coalesced journal output, in output order
pub const COALESCED_GEOUNIT: &str = "Geounit";
pub const COALESCED_VALUE: &str = "Value";
pub const OA_START: &str = "OA Start";
pub const OA_END: &str = "OA End";

pub const COALESCED_HEADER: [&str; 5] = [
    COALESCED_GEOUNIT,
    ACTIVITY_ID,
    COALESCED_VALUE,
    OA_START,
    OA_END,
];

// Tickets input
pub const TICKET_START: &str = "Field Ticket Start Date";
pub const TICKET_END: &str = "Field Ticket End Date";
pub const NET_VALUE_USD: &str = "Field Ticket USD net value";
pub const COUNTRY_NAME: &str = "Country Name";
pub const JOB_GROUP_CODE: &str = "Job Group code";
pub const JOB_TYPE_CODE: &str = "Job Type code";
pub const BILLING_ACCOUNT: &str = "Billing Account";
pub const RIG_NAME: &str = "Rig Name";
pub const RIG_TYPE: &str = "Rig type";
pub const RIG_ENVIRONMENT: &str = "Rig environment";
pub const WELL_TYPE: &str = "Well type";
pub const WELL_OPERATING_ENVIRONMENT: &str = "Well Operating Environment";
pub const WELL_NAME: &str = "Well Name";
pub const BOOKING_STATUS: &str = "Booking Status";
pub const FIELD_TICKET_ID: &str = "Field Ticket ID";
pub const FIELD_TICKET_STATUS: &str = "Field Ticket Status";
pub const WELL_GEOMETRY: &str = "Well Geometry";

// Derived ticket columns
pub const ADJUSTED_DATE: &str = "Adjusted Date";
pub const OPERATING_DAYS: &str = "Operating Days";
pub const OPERATING_CELLMONTH: &str = "Operating_CellMonth";

// Rollup measures
pub const UNIQUE_WELL_COUNT: &str = "Unique_Well_Count";
pub const TICKETS_REVENUE: &str = "Tickets_Revenue";

/// Rollup grouping columns after the adjusted date, in grouping order
pub const DIMENSION_COLUMNS: [&str; 10] = [
    GEOUNIT_CODE,
    COUNTRY_NAME,
    JOB_GROUP_CODE,
    JOB_TYPE_CODE,
    BILLING_ACCOUNT,
    RIG_NAME,
    RIG_TYPE,
    RIG_ENVIRONMENT,
    WELL_TYPE,
    WELL_OPERATING_ENVIRONMENT,
];

pub const ROLLUP_HEADER: [&str; 15] = [
    ADJUSTED_DATE,
    GEOUNIT_CODE,
    COUNTRY_NAME,
    JOB_GROUP_CODE,
    JOB_TYPE_CODE,
    BILLING_ACCOUNT,
    RIG_NAME,
    RIG_TYPE,
    RIG_ENVIRONMENT,
    WELL_TYPE,
    WELL_OPERATING_ENVIRONMENT,
    UNIQUE_WELL_COUNT,
    TICKETS_REVENUE,
    OPERATING_DAYS,
    OPERATING_CELLMONTH,
];

pub const ALLOCATED_HEADER: [&str; 22] = [
    FIELD_TICKET_ID,
    ACTIVITY_ID,
    TICKET_START,
    TICKET_END,
    NET_VALUE_USD,
    GEOUNIT_CODE,
    COUNTRY_NAME,
    JOB_GROUP_CODE,
    JOB_TYPE_CODE,
    BILLING_ACCOUNT,
    RIG_NAME,
    RIG_TYPE,
    RIG_ENVIRONMENT,
    WELL_TYPE,
    WELL_OPERATING_ENVIRONMENT,
    WELL_NAME,
    BOOKING_STATUS,
    FIELD_TICKET_STATUS,
    WELL_GEOMETRY,
    ADJUSTED_DATE,
    OPERATING_DAYS,
    OPERATING_CELLMONTH,
];

// RPE revenue extract
pub const RPE_MONTH_DATE: &str = "Month Date";
pub const RPE_SUB_BUSINESS_LINE: &str = "SL Sub Business Line (Code)";
pub const RPE_GL_ACCOUNT_CATEGORY: &str = "GL Account Category";
