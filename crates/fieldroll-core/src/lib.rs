//! Core types, calendar rules, and errors for fieldroll
//!
//! This crate provides the foundational records, the reporting-month
//! arithmetic, and the error type shared by the fieldroll pipeline.

pub mod aggregation_types;
pub mod calendar;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{FieldrollError, Result};
pub use types::{
    ActivityId, AllocatedTicket, CoalescedActivity, JournalRecord, RawTicketRecord,
    TicketDimensions, TicketRecord,
};
