//! CLI interface for fieldroll
//!
//! This module defines the command-line interface using clap. Without a
//! subcommand the full pipeline runs, equivalent to `fieldroll run`.
//!
//! # Example
//!
//! ```bash
//! # Coalesce the journal and build the rollup under ./raw_data and ./processed_data
//! fieldroll
//!
//! # Two-step flow with explicit paths
//! fieldroll journal --journal in/journal.csv --journal-out out/journal.csv
//! fieldroll tickets --journal-out out/journal.csv --tickets in/tickets.csv --rollup-out out/rollup.csv
//!
//! # Spot-check one geounit and month
//! fieldroll run --geounit APG --month 2019-11
//! ```

use crate::allocator::UnmatchedPolicy;
use crate::coalescer::MergeRule;
use crate::config::PipelineConfig;
use crate::error::{FieldrollError, Result};
use crate::filters::RollupFilter;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Coalesce equipment operating time and roll field tickets up by month
#[derive(Parser, Debug, Clone)]
#[command(name = "fieldroll")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project root holding raw_data/ and processed_data/
    #[arg(long, env = "FIELDROLL_ROOT", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Only show warnings and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Output the summary as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub paths: PathArgs,

    /// Rule deciding when journal intervals merge (adjacent, overlapping)
    #[arg(long, default_value = "adjacent", global = true)]
    pub merge_rule: MergeRule,

    /// Handling of tickets without a journal activity (keep, exclude, reject)
    #[arg(long = "unmatched", default_value = "keep", global = true)]
    pub unmatched: UnmatchedPolicy,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Path overrides, each replacing one path of the root layout
#[derive(Args, Debug, Clone, Default)]
pub struct PathArgs {
    /// Raw journal CSV
    #[arg(long, global = true)]
    pub journal: Option<PathBuf>,

    /// Raw tickets CSV
    #[arg(long, global = true)]
    pub tickets: Option<PathBuf>,

    /// Coalesced journal CSV
    #[arg(long, global = true)]
    pub journal_out: Option<PathBuf>,

    /// Monthly rollup CSV
    #[arg(long, global = true)]
    pub rollup_out: Option<PathBuf>,

    /// Also write one row per allocated ticket to this CSV
    #[arg(long, global = true)]
    pub allocated_out: Option<PathBuf>,
}

/// Revenue spot check over the rollup
#[derive(Args, Debug, Clone, Default)]
pub struct SpotCheckArgs {
    /// Geounit code to sum revenue for
    #[arg(long)]
    pub geounit: Option<String>,

    /// Reporting month to sum revenue for (YYYY-MM)
    #[arg(long)]
    pub month: Option<String>,
}

impl SpotCheckArgs {
    /// Build the filter, or `None` when neither option is given
    pub fn filter(&self) -> Result<Option<RollupFilter>> {
        let mut filter = RollupFilter::new();
        if let Some(geounit) = &self.geounit {
            filter = filter.with_geounit(geounit.clone());
        }
        if let Some(month) = &self.month {
            let (year, month) = parse_month_filter(month)?;
            filter = filter.with_month(year, month);
        }
        Ok((!filter.is_empty()).then_some(filter))
    }
}

/// Revenue extract paths
#[derive(Args, Debug, Clone, Default)]
pub struct RpeArgs {
    /// Raw revenue extract CSV
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Filtered revenue extract CSV
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Coalesce the journal into one row per activity
    Journal,

    /// Build the monthly rollup from an already coalesced journal
    Tickets(SpotCheckArgs),

    /// Coalesce the journal and build the monthly rollup
    Run(SpotCheckArgs),

    /// Keep wireline service revenue rows of a revenue extract
    Rpe(RpeArgs),
}

impl Cli {
    /// Pipeline configuration with every override applied
    pub fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::from_root(&self.root)
            .with_merge_rule(self.merge_rule)
            .with_unmatched_policy(self.unmatched)
            .with_allocated_output(self.paths.allocated_out.clone());

        if let Some(path) = &self.paths.journal {
            config = config.with_journal_input(path.clone());
        }
        if let Some(path) = &self.paths.tickets {
            config = config.with_tickets_input(path.clone());
        }
        if let Some(path) = &self.paths.journal_out {
            config = config.with_journal_output(path.clone());
        }
        if let Some(path) = &self.paths.rollup_out {
            config = config.with_rollup_output(path.clone());
        }
        if let Some(Command::Rpe(args)) = &self.command {
            if let Some(path) = &args.input {
                config = config.with_rpe_input(path.clone());
            }
            if let Some(path) = &args.output {
                config = config.with_rpe_output(path.clone());
            }
        }
        config
    }
}

/// Parse a month filter string
///
/// # Examples
/// ```
/// use fieldroll::cli::parse_month_filter;
///
/// assert_eq!(parse_month_filter("2019-11").unwrap(), (2019, 11));
/// assert!(parse_month_filter("2019-13").is_err());
/// ```
pub fn parse_month_filter(month_str: &str) -> Result<(i32, u32)> {
    let Some((year, month)) = month_str.trim().split_once('-') else {
        return Err(FieldrollError::InvalidMonth(format!(
            "Invalid month format '{month_str}', expected YYYY-MM"
        )));
    };

    let year = year
        .parse::<i32>()
        .map_err(|_| FieldrollError::InvalidMonth(format!("Invalid year in '{month_str}'")))?;
    let month = month
        .parse::<u32>()
        .map_err(|_| FieldrollError::InvalidMonth(format!("Invalid month in '{month_str}'")))?;

    if !(1..=12).contains(&month) {
        return Err(FieldrollError::InvalidMonth(format!(
            "Month must be between 1-12, got {month}"
        )));
    }

    Ok((year, month))
}
