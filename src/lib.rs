//! fieldroll - Coalesce equipment operating time and roll field tickets up by month
//!
//! This library provides functionality to:
//! - Coalesce logged activity intervals into operating days per activity
//! - Clean field tickets and allocate operating days to them
//! - Roll tickets up by reporting month and ticket dimensions
//! - Filter revenue extracts down to wireline service revenue
//!
//! # Examples
//!
//! ```no_run
//! use fieldroll::{
//!     aggregation::Aggregator,
//!     allocator::{Allocator, UnmatchedPolicy},
//!     cleaner::clean,
//!     coalescer::{MergeRule, coalesce},
//!     data_loader::DataLoader,
//! };
//! use std::path::Path;
//!
//! fn main() -> fieldroll::Result<()> {
//!     let loader = DataLoader::new();
//!     let journal = loader.load_journal(Path::new("raw_data/global_journal_operatingtime.csv"))?;
//!     let activities = coalesce(journal, MergeRule::Adjacent);
//!
//!     let tickets = clean(loader.load_tickets(Path::new("raw_data/global_tickets_wles_ops_data.csv"))?);
//!     let allocated = Allocator::new(UnmatchedPolicy::Keep).allocate(tickets, &activities)?;
//!     let rollups = Aggregator::new().aggregate(&allocated);
//!
//!     println!("{} rollup rows", rollups.len());
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod allocator;
pub mod cleaner;
pub mod cli;
pub mod coalescer;
pub mod columns;
pub mod config;
pub mod data_loader;
pub mod filters;
pub mod output;
pub mod pipeline;
pub mod rpe;

pub use fieldroll_core::{aggregation_types, calendar, error, types};

// Re-export commonly used types
pub use error::{FieldrollError, Result};
pub use types::{ActivityId, AllocatedTicket, CoalescedActivity, JournalRecord, TicketRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
