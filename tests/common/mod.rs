//! Common test utilities and helpers for fieldroll tests
//!
//! Builders for journal and ticket rows, and a fixture that writes them into
//! the conventional `raw_data/` layout of a temporary project root.

use fieldroll::config::PipelineConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const JOURNAL_HEADER: &str =
    "Activity ID,Sl Geounit (Code),Journal Activity start time,Journal Activity end time,Comment";

pub const TICKETS_HEADER: &str = "Field Ticket ID,Activity ID,Field Ticket Start Date,Field Ticket End Date,\
Field Ticket USD net value,Sl Geounit (Code),Country Name,Job Group code,Job Type code,Billing Account,\
Rig Name,Rig type,Rig environment,Well type,Well Operating Environment,Well Name,Booking Status";

/// Builder for one ticket row
#[derive(Clone)]
pub struct TicketBuilder {
    ticket_id: String,
    activity_id: String,
    start: String,
    end: String,
    net_value: String,
    geounit: String,
    country: String,
    rig_name: String,
    billing_account: String,
    well_name: String,
}

impl TicketBuilder {
    /// Create a new builder with default values
    pub fn new(activity_id: &str) -> Self {
        Self {
            ticket_id: format!("FT-{activity_id}"),
            activity_id: activity_id.to_string(),
            start: "2024-01-02 00:00:00".to_string(),
            end: "2024-01-10 00:00:00".to_string(),
            net_value: "1000.0".to_string(),
            geounit: "NSA".to_string(),
            country: "Norway".to_string(),
            rig_name: "Rig 7".to_string(),
            billing_account: "ACME".to_string(),
            well_name: "W-1".to_string(),
        }
    }

    pub fn with_ticket_id(mut self, id: &str) -> Self {
        self.ticket_id = id.to_string();
        self
    }

    pub fn with_end(mut self, end: &str) -> Self {
        self.end = end.to_string();
        self
    }

    pub fn with_net_value(mut self, value: &str) -> Self {
        self.net_value = value.to_string();
        self
    }

    pub fn with_geounit(mut self, geounit: &str) -> Self {
        self.geounit = geounit.to_string();
        self
    }

    #[allow(dead_code)]
    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    pub fn with_rig(mut self, rig: &str) -> Self {
        self.rig_name = rig.to_string();
        self
    }

    pub fn with_well(mut self, well: &str) -> Self {
        self.well_name = well.to_string();
        self
    }

    /// Render the row in [`TICKETS_HEADER`] order
    pub fn build(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},WL,OH,{},{},Jackup,Offshore,Oil,Offshore,{},Booked",
            self.ticket_id,
            self.activity_id,
            self.start,
            self.end,
            self.net_value,
            self.geounit,
            self.country,
            self.billing_account,
            self.rig_name,
            self.well_name
        )
    }
}

/// Render one journal row in [`JOURNAL_HEADER`] order
pub fn journal_row(activity_id: &str, geounit: &str, start: &str, end: &str) -> String {
    format!("{activity_id},{geounit},{start},{end},")
}

/// Temporary project root with raw inputs in place
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("raw_data")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig::from_root(self.root())
    }

    pub fn write_journal(&self, rows: &[String]) -> PathBuf {
        let path = self.config().journal_input;
        write_table(&path, JOURNAL_HEADER, rows);
        path
    }

    pub fn write_tickets(&self, tickets: &[TicketBuilder]) -> PathBuf {
        let rows: Vec<String> = tickets.iter().map(TicketBuilder::build).collect();
        let path = self.config().tickets_input;
        write_table(&path, TICKETS_HEADER, &rows);
        path
    }

    #[allow(dead_code)]
    pub fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root().join("raw_data").join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

fn write_table(path: &Path, header: &str, rows: &[String]) {
    let mut contents = String::from(header);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(path, contents).unwrap();
}

/// Standard sample: two activities, one of them split over adjacent intervals
#[allow(dead_code)]
pub fn sample_fixture() -> Fixture {
    let fixture = Fixture::new();
    fixture.write_journal(&[
        journal_row("A-1", "NSA", "2024-01-05 08:00:00", "2024-01-10 17:00:00"),
        journal_row("A-1", "NSA", "2024-01-01 08:00:00", "2024-01-05 12:00:00"),
        journal_row("A-2", "APG", "2024-03-20 00:00:00", "2024-03-22 00:00:00"),
    ]);
    fixture.write_tickets(&[
        TicketBuilder::new("A-1").with_ticket_id("FT-1").with_net_value("1200.0"),
        TicketBuilder::new("A-1")
            .with_ticket_id("FT-2")
            .with_net_value("300.5")
            .with_well("W-2"),
        TicketBuilder::new("A-1")
            .with_ticket_id("FT-3")
            .with_net_value("")
            .with_end("2024-01-27 00:00:00"),
        TicketBuilder::new("A-2")
            .with_ticket_id("FT-4")
            .with_geounit("APG")
            .with_rig("Rig 1")
            .with_end("2024-03-26 00:00:00")
            .with_net_value("999.99"),
        TicketBuilder::new("ZZ-9").with_ticket_id("FT-5").with_net_value("50.0"),
    ]);
    fixture
}
