//! Error types for the resource stores.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the given id exists in the store
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },
}

impl StoreError {
    /// Creates a not-found error for a record of the given kind.
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        StoreError::NotFound { kind, id }
    }

    /// Returns true if this error indicates the record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns the kind of record the operation was looking for.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::NotFound { kind, .. } => *kind,
        }
    }
}
