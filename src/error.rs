// Error taxonomy for the planner core
//
// - ValidationError: a create/update was rejected before anything changed
// - NotFound: update/remove/seat against an unknown id
// - StorageError: the persistence adapter failed; the in-memory change stands

use thiserror::Error;

use crate::entities::EntityKind;

/// A single rejected field:
/// which entity, which field, what is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{entity}] {field}: {message}")]
pub struct ValidationError {
    pub entity: String,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(entity: impl std::fmt::Display, field: &str, message: impl Into<String>) -> Self {
        ValidationError {
            entity: entity.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn required(entity: EntityKind, field: &str) -> Self {
        Self::new(entity, field, "Required field is empty")
    }

    pub fn negative(entity: EntityKind, field: &str, value: f64) -> Self {
        Self::new(entity, field, format!("Must not be negative, got {}", value))
    }
}

/// Failure of the persistence adapter
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure while reading or writing a guest spreadsheet
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Errors surfaced by store commands
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Guest {guest_id} is seated at table {table_id}")]
    GuestSeated { guest_id: String, table_id: String },

    #[error("Guest {guest_id} is already seated at table {table_id}")]
    AlreadySeated { guest_id: String, table_id: String },

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True when the command was rejected by input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
