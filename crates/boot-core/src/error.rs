//! Selection and rendering errors

use crate::render::Protocol;
use boot_store::StoreError;
use thiserror::Error;

/// Errors produced while selecting or rendering a boot configuration.
///
/// `NoMatch`, the not-found kinds and `Unsupported` are expected outcomes for
/// unprovisioned machines or profiles a protocol cannot express. `Template`,
/// `Format` and `Store` are faults.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No group selector is satisfied by the request labels
    #[error("no group matches the request labels")]
    NoMatch,

    /// A group references a profile that does not exist
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// A group looked up by id does not exist
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// The profile's boot mode cannot be expressed by the protocol
    #[error("{protocol} cannot render profile: {reason}")]
    Unsupported {
        /// Protocol that was asked to render
        protocol: Protocol,
        /// Why the boot mode is not renderable
        reason: String,
    },

    /// Script rendering failed
    #[error("template error: {0}")]
    Template(String),

    /// Writing the script into its buffer failed
    #[error("failed to format script: {0}")]
    Format(#[from] std::fmt::Error),

    /// Storage backend failure
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Whether the error should surface to the client as "not found".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::NoMatch
                | CoreError::ProfileNotFound(_)
                | CoreError::GroupNotFound(_)
                | CoreError::Unsupported { .. }
        )
    }

    /// Whether the error is normal control flow rather than a fault.
    ///
    /// Expected errors are never logged at error level.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, CoreError::NoMatch | CoreError::Unsupported { .. })
    }
}
