pub mod activity;
pub mod journal;
pub mod user;

use thiserror::Error;

use crate::database::manager::DatabaseError;

pub use activity::{ActivitiesCalendar, Activity, ActivityChanges, ActivitySummary, NewActivity};
pub use journal::{JournalChanges, JournalEntries, JournalEntry, NewJournalEntry};
pub use user::{User, Users};

/// Failures raised by the model layer
#[derive(Debug, Error)]
pub enum ModelError {
    /// No record matched the requested id or owner
    #[error("{0}")]
    NotFound(String),

    /// Update called without any fields to change
    #[error("{0}")]
    InvalidUpdate(String),

    /// Request the store would accept but the model refuses, such as a taken username
    #[error("{0}")]
    BadRequest(String),

    /// Unknown username or wrong password
    #[error("{0}")]
    Unauthorized(String),

    /// Hashing or verifying a password failed; a server fault, not a bad login
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Failed to decode row: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}
