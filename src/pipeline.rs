//! Pipeline stages wired together
//!
//! Three entry points share the same stages:
//! - [`Pipeline::run_journal`] coalesces the raw journal and writes it
//! - [`Pipeline::run_tickets`] reads a previously written coalesced journal
//!   and produces the monthly rollup
//! - [`Pipeline::run`] does both in one pass
//!
//! Every output of a call is rendered in memory first and committed through
//! [`OutputSet`], so a failing stage writes nothing.
//!
//! # Examples
//!
//! ```no_run
//! use fieldroll::config::PipelineConfig;
//! use fieldroll::pipeline::Pipeline;
//! use std::path::Path;
//!
//! # fn example() -> fieldroll::Result<()> {
//! let pipeline = Pipeline::new(PipelineConfig::from_root(Path::new(".")));
//! let report = pipeline.run()?;
//! println!("{} rollup groups", report.totals.groups);
//! # Ok(())
//! # }
//! ```

use crate::aggregation::Aggregator;
use crate::aggregation_types::{MonthSummary, MonthlyRollup, Totals};
use crate::allocator::{AllocationReport, Allocator};
use crate::cleaner::clean_with_report;
use crate::coalescer::{MergeRule, coalesce};
use crate::config::PipelineConfig;
use crate::data_loader::DataLoader;
use crate::error::Result;
use crate::output::{OutputSet, render_allocated, render_coalesced, render_rollups, render_rpe};
use crate::rpe::RpeFilter;
use crate::types::CoalescedActivity;
use tracing::info;

/// Result of coalescing the journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalReport {
    /// Journal intervals read
    pub records: usize,
    /// Activities written
    pub activities: usize,
    /// Sum of the coalesced values
    pub operating_days: i64,
    pub merge_rule: MergeRule,
}

/// Result of the tickets stage
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Present when the journal was coalesced in the same run
    pub journal: Option<JournalReport>,
    /// Tickets read
    pub tickets: usize,
    /// Empty cells the cleaner filled
    pub cells_filled: usize,
    pub allocation: AllocationReport,
    pub rollups: Vec<MonthlyRollup>,
    pub months: Vec<MonthSummary>,
    pub totals: Totals,
}

/// Result of filtering a revenue extract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpeReport {
    pub read: usize,
    pub kept: usize,
}

/// Pipeline runner
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    loader: DataLoader,
    aggregator: Aggregator,
}

impl Pipeline {
    /// Create a new Pipeline
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            loader: DataLoader::new(),
            aggregator: Aggregator::new(),
        }
    }

    /// Enable or disable progress spinners while reading inputs
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.loader = self.loader.with_progress(show_progress);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn coalesce_journal(&self) -> Result<(Vec<CoalescedActivity>, JournalReport)> {
        let records = self.loader.load_journal(&self.config.journal_input)?;
        let count = records.len();
        let activities = coalesce(records, self.config.merge_rule);

        let report = JournalReport {
            records: count,
            activities: activities.len(),
            operating_days: activities.iter().map(|a| a.value).sum(),
            merge_rule: self.config.merge_rule,
        };
        info!(
            "Coalesced {} journal intervals into {} activities, {} operating days",
            report.records, report.activities, report.operating_days
        );
        Ok((activities, report))
    }

    fn process_tickets(
        &self,
        activities: &[CoalescedActivity],
        outputs: &mut OutputSet,
    ) -> Result<RunReport> {
        let raw = self.loader.load_tickets(&self.config.tickets_input)?;
        let count = raw.len();
        info!("Loaded {} tickets", count);

        let (tickets, cleaning) = clean_with_report(raw);
        let (allocated, allocation) = Allocator::new(self.config.unmatched_policy)
            .allocate_with_report(tickets, activities)?;

        let rollups = self.aggregator.aggregate(&allocated);
        let months = Aggregator::aggregate_by_month(&rollups);
        let totals = Totals::from_rollups(&rollups);

        outputs.add(&self.config.rollup_output, render_rollups(&rollups)?);
        if let Some(path) = &self.config.allocated_output {
            outputs.add(path, render_allocated(&allocated)?);
        }

        Ok(RunReport {
            journal: None,
            tickets: count,
            cells_filled: cleaning.total(),
            allocation,
            rollups,
            months,
            totals,
        })
    }

    /// Coalesce the journal and write the coalesced table
    pub fn run_journal(&self) -> Result<JournalReport> {
        self.config.validate()?;
        let (activities, report) = self.coalesce_journal()?;

        let mut outputs = OutputSet::new();
        outputs.add(&self.config.journal_output, render_coalesced(&activities)?);
        outputs.commit()?;
        Ok(report)
    }

    /// Build the rollup from a previously written coalesced journal
    pub fn run_tickets(&self) -> Result<RunReport> {
        self.config.validate()?;
        let activities = self.loader.load_coalesced(&self.config.journal_output)?;
        info!("Loaded {} coalesced activities", activities.len());

        let mut outputs = OutputSet::new();
        let report = self.process_tickets(&activities, &mut outputs)?;
        outputs.commit()?;
        Ok(report)
    }

    /// Coalesce the journal and build the rollup in one pass
    pub fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        let (activities, journal) = self.coalesce_journal()?;

        let mut outputs = OutputSet::new();
        outputs.add(&self.config.journal_output, render_coalesced(&activities)?);
        let mut report = self.process_tickets(&activities, &mut outputs)?;
        outputs.commit()?;

        report.journal = Some(journal);
        Ok(report)
    }

    /// Filter the revenue extract and write the result
    pub fn run_rpe(&self) -> Result<RpeReport> {
        self.config.validate()?;
        let extract = RpeFilter::default().apply(&self.loader, &self.config.rpe_input)?;

        let mut outputs = OutputSet::new();
        outputs.add(&self.config.rpe_output, render_rpe(&extract)?);
        outputs.commit()?;

        Ok(RpeReport {
            read: extract.read,
            kept: extract.rows.len(),
        })
    }
}
