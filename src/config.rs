//! Pipeline configuration
//!
//! Every path the pipeline reads or writes is carried explicitly in
//! [`PipelineConfig`]. [`PipelineConfig::from_root`] derives the
//! conventional `raw_data/` and `processed_data/` layout under a project
//! root; each path can then be overridden on its own.
//!
//! # Examples
//!
//! ```
//! use fieldroll::config::PipelineConfig;
//! use fieldroll::coalescer::MergeRule;
//! use std::path::Path;
//!
//! let config = PipelineConfig::from_root(Path::new("/data/ops"))
//!     .with_merge_rule(MergeRule::Overlapping)
//!     .with_allocated_output(Some("/tmp/tickets.csv".into()));
//! assert!(config.journal_input.ends_with("raw_data/global_journal_operatingtime.csv"));
//! ```

use crate::allocator::UnmatchedPolicy;
use crate::coalescer::MergeRule;
use crate::error::{FieldrollError, Result};
use std::path::{Path, PathBuf};

/// Directory holding the raw extracts, relative to the root
pub const RAW_DATA_DIR: &str = "raw_data";

/// Directory the pipeline writes to, relative to the root
pub const PROCESSED_DATA_DIR: &str = "processed_data";

pub const JOURNAL_INPUT_FILE: &str = "global_journal_operatingtime.csv";
pub const TICKETS_INPUT_FILE: &str = "global_tickets_wles_ops_data.csv";
pub const JOURNAL_OUTPUT_FILE: &str = "processed_journal_operatingtime.csv";
pub const ROLLUP_OUTPUT_FILE: &str = "processed_tickets_wles_ops_data.csv";
pub const RPE_INPUT_FILE: &str = "global_rpe_revenue.csv";
pub const RPE_OUTPUT_FILE: &str = "processed_rpe_revenue.csv";

/// Paths and policies for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Raw journal intervals
    pub journal_input: PathBuf,
    /// Raw field tickets
    pub tickets_input: PathBuf,
    /// Coalesced journal; written by the journal stage, read by the tickets stage
    pub journal_output: PathBuf,
    /// Monthly rollup
    pub rollup_output: PathBuf,
    /// Per-ticket detail, written only when set
    pub allocated_output: Option<PathBuf>,
    /// Raw revenue extract
    pub rpe_input: PathBuf,
    /// Filtered revenue extract
    pub rpe_output: PathBuf,
    pub merge_rule: MergeRule,
    pub unmatched_policy: UnmatchedPolicy,
}

impl PipelineConfig {
    /// Conventional layout under `root`
    pub fn from_root(root: &Path) -> Self {
        let raw = root.join(RAW_DATA_DIR);
        let processed = root.join(PROCESSED_DATA_DIR);
        Self {
            journal_input: raw.join(JOURNAL_INPUT_FILE),
            tickets_input: raw.join(TICKETS_INPUT_FILE),
            journal_output: processed.join(JOURNAL_OUTPUT_FILE),
            rollup_output: processed.join(ROLLUP_OUTPUT_FILE),
            allocated_output: None,
            rpe_input: raw.join(RPE_INPUT_FILE),
            rpe_output: processed.join(RPE_OUTPUT_FILE),
            merge_rule: MergeRule::default(),
            unmatched_policy: UnmatchedPolicy::default(),
        }
    }

    pub fn with_journal_input(mut self, path: PathBuf) -> Self {
        self.journal_input = path;
        self
    }

    pub fn with_tickets_input(mut self, path: PathBuf) -> Self {
        self.tickets_input = path;
        self
    }

    pub fn with_journal_output(mut self, path: PathBuf) -> Self {
        self.journal_output = path;
        self
    }

    pub fn with_rollup_output(mut self, path: PathBuf) -> Self {
        self.rollup_output = path;
        self
    }

    pub fn with_allocated_output(mut self, path: Option<PathBuf>) -> Self {
        self.allocated_output = path;
        self
    }

    pub fn with_rpe_input(mut self, path: PathBuf) -> Self {
        self.rpe_input = path;
        self
    }

    pub fn with_rpe_output(mut self, path: PathBuf) -> Self {
        self.rpe_output = path;
        self
    }

    /// Set the rule that decides when journal intervals merge
    pub fn with_merge_rule(mut self, rule: MergeRule) -> Self {
        self.merge_rule = rule;
        self
    }

    /// Set how tickets without a journal activity are handled
    pub fn with_unmatched_policy(mut self, policy: UnmatchedPolicy) -> Self {
        self.unmatched_policy = policy;
        self
    }

    /// Every file a full run writes
    pub fn outputs(&self) -> Vec<&Path> {
        let mut outputs = vec![self.journal_output.as_path(), self.rollup_output.as_path()];
        if let Some(path) = &self.allocated_output {
            outputs.push(path.as_path());
        }
        outputs
    }

    /// Reject layouts where a run would overwrite one of its own inputs or
    /// write two outputs to the same file
    pub fn validate(&self) -> Result<()> {
        let inputs = [
            self.journal_input.as_path(),
            self.tickets_input.as_path(),
            self.rpe_input.as_path(),
        ];
        let mut outputs = self.outputs();
        outputs.push(self.rpe_output.as_path());

        for (idx, output) in outputs.iter().enumerate() {
            if inputs.contains(output) {
                return Err(FieldrollError::Config(format!(
                    "{} is both an input and an output",
                    output.display()
                )));
            }
            if outputs[idx + 1..].contains(output) {
                return Err(FieldrollError::Config(format!(
                    "{} is used for two outputs",
                    output.display()
                )));
            }
        }
        Ok(())
    }
}
