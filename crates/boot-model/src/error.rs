//! Model validation and decoding errors

use thiserror::Error;

/// Errors raised while validating or decoding profiles and groups
#[derive(Debug, Error)]
pub enum ModelError {
    /// The document has an empty `id`
    #[error("Id is required")]
    IdRequired,

    /// A group does not reference a profile
    #[error("Profile is required")]
    ProfileRequired,

    /// A profile document sets both `boot` and `chain`
    #[error("profile sets both boot and chain modes")]
    ConflictingBootModes,

    /// The external serialization could not be decoded
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}
