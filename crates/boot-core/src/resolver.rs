//! Boot mode resolution

use boot_model::{BootMode, BootModeKind, Chain, NetBoot, Profile};

/// A profile's boot mode, borrowed for rendering.
///
/// `Unset` is a distinct outcome: renderers must reject it rather than treat
/// it as an empty netboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBootMode<'a> {
    /// Direct network boot
    NetBoot(&'a NetBoot),
    /// Chain-load another script
    Chain(&'a Chain),
    /// The profile has no boot mode
    Unset,
}

impl ResolvedBootMode<'_> {
    /// Variant without payload, or `None` when unset.
    #[must_use]
    pub fn kind(&self) -> Option<BootModeKind> {
        match self {
            ResolvedBootMode::NetBoot(_) => Some(BootModeKind::NetBoot),
            ResolvedBootMode::Chain(_) => Some(BootModeKind::Chain),
            ResolvedBootMode::Unset => None,
        }
    }
}

impl<'a> From<Option<&'a BootMode>> for ResolvedBootMode<'a> {
    fn from(mode: Option<&'a BootMode>) -> Self {
        match mode {
            Some(BootMode::NetBoot(boot)) => ResolvedBootMode::NetBoot(boot),
            Some(BootMode::Chain(chain)) => ResolvedBootMode::Chain(chain),
            None => ResolvedBootMode::Unset,
        }
    }
}

/// Resolves the boot mode of `profile`.
#[must_use]
pub fn resolve(profile: &Profile) -> ResolvedBootMode<'_> {
    profile.boot_mode.as_ref().into()
}
