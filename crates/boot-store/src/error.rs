//! Storage errors

use crate::blob::BlobKind;
use boot_model::ModelError;
use thiserror::Error;

/// Kind of entity a storage lookup was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// A profile
    Profile,
    /// A group
    Group,
    /// A config blob
    Blob(BlobKind),
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Profile => f.write_str("profile"),
            EntityKind::Group => f.write_str("group"),
            EntityKind::Blob(kind) => write!(f, "{kind} config"),
        }
    }
}

/// Errors that can occur when reading or writing the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up
        kind: EntityKind,
        /// Identifier that was looked up
        id: String,
    },

    /// Identifier cannot be used as a storage key
    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    /// Document failed validation or decoding
    #[error("Invalid document: {0}")]
    Model(#[from] ModelError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether the error reports a missing entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Rejects identifiers that are empty or could escape a storage directory.
pub(crate) fn check_id(id: &str) -> Result<(), StoreError> {
    let invalid = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}
