//! Error types for daybook.

use chrono::NaiveDate;
use thiserror::Error;

use crate::event::{CategoryId, EventId};

/// Errors that can occur in daybook operations.
#[derive(Error, Debug)]
pub enum DaybookError {
    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Invalid event: {0}")]
    Validation(String),

    #[error("Import failed: {0}")]
    Import(String),

    /// Recurrence end falls before the first occurrence. The store degrades
    /// to a single-instance event and reports this as a warning.
    #[error("Recurrence ends on {end} which is before the event date {date}")]
    RecurrenceConfig { date: NaiveDate, end: NaiveDate },

    #[error("Could not persist calendar state: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for daybook operations.
pub type DaybookResult<T> = Result<T, DaybookError>;
