//! Error types for family network operations

use thiserror::Error;

/// Errors that can occur while mutating or persisting family networks
#[derive(Error, Debug)]
pub enum FamilyError {
    /// No network with this id exists in the store
    #[error("Family network not found: {0}")]
    NetworkNotFound(String),

    /// A relationship endpoint does not exist in the network
    #[error("Family member not found: {0}")]
    MemberNotFound(String),

    /// Rejected input (empty names and the like)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// SQLite storage error
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Snapshot (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV import error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock was poisoned by a panicking writer
    #[error("Lock poisoned: {0}")]
    Poisoned(String),
}

impl FamilyError {
    /// True for errors that mean "the thing you asked for does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FamilyError::NetworkNotFound(_) | FamilyError::MemberNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FamilyError>;
