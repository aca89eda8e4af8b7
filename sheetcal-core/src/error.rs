//! Error types for sheetcal operations.

use thiserror::Error;

use crate::calendar::CalendarError;

/// Errors that abort a sync pass or prevent one from starting.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Row {row}: {reason}")]
    InvalidRow { row: u32, reason: String },

    #[error("Row {row}: failed to create event: {source}")]
    CreateFailed {
        row: u32,
        #[source]
        source: CalendarError,
    },

    #[error("Sheet error: {0}")]
    Sheet(String),

    /// The pass stopped on `cause`, and writing back the rows before it
    /// failed as well.
    #[error("{cause}; results of earlier rows were not written back: {flush}")]
    AbortedUnflushed {
        #[source]
        cause: Box<SyncError>,
        flush: Box<SyncError>,
    },
}

impl SyncError {
    pub fn invalid_row(row: u32, reason: impl Into<String>) -> Self {
        SyncError::InvalidRow {
            row,
            reason: reason.into(),
        }
    }
}

/// Result type alias for sheetcal operations.
pub type SyncResult<T> = Result<T, SyncError>;
