//! Profile
//!
//! Defines boot configurations (kernel, initrd, args, or a chain URL) and the
//! opaque references to ignition, cloud-init and generic configs.

use crate::error::ModelError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Direct network boot directives.
///
/// `initrd` and `args` keep caller order: boot loaders load initrds and pass
/// kernel arguments in the order given.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NetBoot {
    /// Kernel image URL or path
    pub kernel: String,

    /// Initrd image URLs or paths
    #[serde(default)]
    pub initrd: Vec<String>,

    /// Kernel command-line arguments
    #[serde(default)]
    pub args: Vec<String>,
}

/// Chain-load another boot script instead of booting directly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Chain {
    /// URL of the script to chain to
    pub url: String,
}

/// How a profile boots a machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootMode {
    /// Boot a kernel and initrds directly
    NetBoot(NetBoot),
    /// Chain-load a script from another URL
    Chain(Chain),
}

/// Payload-free discriminant of [`BootMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootModeKind {
    /// [`BootMode::NetBoot`]
    NetBoot,
    /// [`BootMode::Chain`]
    Chain,
}

impl BootMode {
    /// Returns the variant without its payload.
    #[must_use]
    pub fn kind(&self) -> BootModeKind {
        match self {
            BootMode::NetBoot(_) => BootModeKind::NetBoot,
            BootMode::Chain(_) => BootModeKind::Chain,
        }
    }
}

impl std::fmt::Display for BootModeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BootModeKind::NetBoot => f.write_str("boot"),
            BootModeKind::Chain => f.write_str("chain"),
        }
    }
}

/// A named boot configuration.
///
/// A profile without a boot mode is valid: it only serves ignition,
/// cloud-init or generic configs and never answers a boot script request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ProfileDocument", into = "ProfileDocument")]
pub struct Profile {
    /// Unique profile identifier
    pub id: String,

    /// Display name
    pub name: Option<String>,

    /// Boot directives, if the profile can answer boot script requests
    pub boot_mode: Option<BootMode>,

    /// Ignition config reference
    pub ignition_id: Option<String>,

    /// Cloud-init config reference
    pub cloud_id: Option<String>,

    /// Generic config reference
    pub generic_id: Option<String>,
}

/// External JSON form of a [`Profile`].
///
/// Field names are camelCase; snake_case spellings are accepted on input.
/// At most one of `boot` and `chain` may be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileDocument {
    /// Unique profile identifier
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Direct network boot directives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot: Option<NetBoot>,

    /// Chain-load directive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<Chain>,

    /// Ignition config reference
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "ignition_id")]
    pub ignition_id: Option<String>,

    /// Cloud-init config reference
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "cloud_id")]
    pub cloud_id: Option<String>,

    /// Generic config reference
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "generic_id")]
    pub generic_id: Option<String>,
}

impl TryFrom<ProfileDocument> for Profile {
    type Error = ModelError;

    fn try_from(doc: ProfileDocument) -> Result<Self, Self::Error> {
        let boot_mode = match (doc.boot, doc.chain) {
            (Some(_), Some(_)) => return Err(ModelError::ConflictingBootModes),
            (Some(boot), None) => Some(BootMode::NetBoot(boot)),
            (None, Some(chain)) => Some(BootMode::Chain(chain)),
            (None, None) => None,
        };

        Ok(Self {
            id: doc.id,
            name: non_empty(doc.name),
            boot_mode,
            ignition_id: non_empty(doc.ignition_id),
            cloud_id: non_empty(doc.cloud_id),
            generic_id: non_empty(doc.generic_id),
        })
    }
}

impl From<Profile> for ProfileDocument {
    fn from(profile: Profile) -> Self {
        let (boot, chain) = match profile.boot_mode {
            Some(BootMode::NetBoot(boot)) => (Some(boot), None),
            Some(BootMode::Chain(chain)) => (None, Some(chain)),
            None => (None, None),
        };

        Self {
            id: profile.id,
            name: profile.name,
            boot,
            chain,
            ignition_id: profile.ignition_id,
            cloud_id: profile.cloud_id,
            generic_id: profile.generic_id,
        }
    }
}

// Empty strings in documents mean "no reference".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Profile {
    /// Decodes a profile from its JSON document.
    ///
    /// Decoding does not validate; call [`Profile::validate`] before persisting.
    pub fn parse(data: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Encodes the profile as a pretty-printed JSON document.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the profile can be persisted or served.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.id.is_empty() {
            return Err(ModelError::IdRequired);
        }
        Ok(())
    }

    /// Returns the netboot directives, if that is the profile's mode.
    #[must_use]
    pub fn net_boot(&self) -> Option<&NetBoot> {
        match &self.boot_mode {
            Some(BootMode::NetBoot(boot)) => Some(boot),
            _ => None,
        }
    }

    /// Returns the chain directive, if that is the profile's mode.
    #[must_use]
    pub fn chain(&self) -> Option<&Chain> {
        match &self.boot_mode {
            Some(BootMode::Chain(chain)) => Some(chain),
            _ => None,
        }
    }
}

/// Deep-copies an optional profile.
///
/// The copy owns fresh `initrd` and `args` vectors, so mutating it never
/// shows through to the original.
#[must_use]
pub fn copy_profile(profile: Option<&Profile>) -> Option<Profile> {
    profile.cloned()
}
