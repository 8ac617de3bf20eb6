//! Error types for fieldroll
//!
//! This module defines the error types used throughout the fieldroll library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! # Example
//!
//! ```
//! use fieldroll_core::error::{FieldrollError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to FieldrollError
//!     let _file = std::fs::read_to_string("nonexistent.csv")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ActivityId;

/// Main error type for fieldroll operations
///
/// Every failure aborts the run. Input errors carry the file, the physical
/// CSV line and the column so the offending cell can be found directly.
#[derive(Error, Debug)]
pub enum FieldrollError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader or writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("Missing column '{column}' in {}", file.display())]
    MissingColumn {
        /// The input file
        file: PathBuf,
        /// The column that was expected
        column: String,
    },

    /// A required cell is empty
    #[error("Missing value for '{column}' in {} at line {line}", file.display())]
    MissingValue {
        /// The input file
        file: PathBuf,
        /// Physical line number, header is line 1
        line: u64,
        /// The column of the empty cell
        column: String,
    },

    /// A date or timestamp cell could not be parsed
    #[error("Invalid date '{value}' for '{column}' in {} at line {line}", file.display())]
    InvalidDate {
        /// The input file
        file: PathBuf,
        /// Physical line number, header is line 1
        line: u64,
        /// The column of the bad cell
        column: String,
        /// Raw cell content
        value: String,
    },

    /// A numeric cell could not be parsed
    #[error("Invalid number '{value}' for '{column}' in {} at line {line}", file.display())]
    InvalidNumber {
        /// The input file
        file: PathBuf,
        /// Physical line number, header is line 1
        line: u64,
        /// The column of the bad cell
        column: String,
        /// Raw cell content
        value: String,
    },

    /// Tickets reference activities missing from the coalesced journal
    #[error("{tickets} ticket(s) reference unknown activities, first: {activity_id}")]
    UnmatchedActivity {
        /// First unmatched activity in ticket order
        activity_id: ActivityId,
        /// Number of tickets without a journal match
        tickets: usize,
    },

    /// Invalid reporting month argument
    #[error("Invalid month format: {0}")]
    InvalidMonth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in fieldroll
///
/// # Example
///
/// ```
/// use fieldroll_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, FieldrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = FieldrollError::MissingColumn {
            file: PathBuf::from("raw_data/journal.csv"),
            column: "Activity ID".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Missing column 'Activity ID' in raw_data/journal.csv"
        );

        let error = FieldrollError::InvalidDate {
            file: PathBuf::from("tickets.csv"),
            line: 7,
            column: "Field Ticket End Date".to_string(),
            value: "not-a-date".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date 'not-a-date' for 'Field Ticket End Date' in tickets.csv at line 7"
        );
    }

    #[test]
    fn test_unmatched_display() {
        let error = FieldrollError::UnmatchedActivity {
            activity_id: ActivityId::new("ACT-9"),
            tickets: 3,
        };
        assert_eq!(
            error.to_string(),
            "3 ticket(s) reference unknown activities, first: ACT-9"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let fieldroll_error: FieldrollError = io_error.into();
        assert!(matches!(fieldroll_error, FieldrollError::Io(_)));
    }
}
