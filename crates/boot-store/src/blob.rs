//! Opaque config blob kinds

use serde::{Deserialize, Serialize};

/// Category of an opaque config blob referenced by a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobKind {
    /// Ignition config
    Ignition,
    /// Cloud-init config
    Cloud,
    /// Generic config
    Generic,
}

impl BlobKind {
    /// All blob kinds.
    pub const ALL: [BlobKind; 3] = [BlobKind::Ignition, BlobKind::Cloud, BlobKind::Generic];

    /// Directory name and URL segment for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BlobKind::Ignition => "ignition",
            BlobKind::Cloud => "cloud",
            BlobKind::Generic => "generic",
        }
    }

    /// Returns the blob reference a profile holds for this kind.
    #[must_use]
    pub fn reference(self, profile: &boot_model::Profile) -> Option<&str> {
        match self {
            BlobKind::Ignition => profile.ignition_id.as_deref(),
            BlobKind::Cloud => profile.cloud_id.as_deref(),
            BlobKind::Generic => profile.generic_id.as_deref(),
        }
    }
}

impl std::fmt::Display for BlobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlobKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown config kind: {s}"))
    }
}
