//! Protocol renderers
//!
//! Each boot protocol has a renderer that turns a resolved boot mode into the
//! script text that protocol's boot loader executes. Renderers declare which
//! boot modes they support and fail with [`CoreError::Unsupported`] on the rest.

mod grub;
mod ipxe;

pub use grub::*;
pub use ipxe::*;

use crate::error::CoreError;
use crate::resolver::ResolvedBootMode;
use boot_model::BootModeKind;

/// Network boot protocols with a script renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// iPXE scripts
    Ipxe,
    /// GRUB2 configs
    Grub,
}

impl Protocol {
    /// Lowercase label used in logs and metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Ipxe => "ipxe",
            Protocol::Grub => "grub",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Ipxe => f.write_str("iPXE"),
            Protocol::Grub => f.write_str("GRUB2"),
        }
    }
}

/// Renders boot modes into a protocol's script dialect.
pub trait Renderer: Send + Sync {
    /// Protocol this renderer produces scripts for.
    fn protocol(&self) -> Protocol;

    /// Whether `kind` can be expressed in this protocol.
    fn supports(&self, kind: BootModeKind) -> bool;

    /// Renders `mode` as a script.
    ///
    /// Fails with [`CoreError::Unsupported`] for unset or unsupported modes
    /// and [`CoreError::Template`] when the script cannot be produced.
    fn render(&self, mode: ResolvedBootMode<'_>) -> Result<String, CoreError>;
}

pub(crate) const NO_BOOT_MODE: &str = "no boot or chain mode available";

pub(crate) fn unsupported(protocol: Protocol, reason: impl Into<String>) -> CoreError {
    CoreError::Unsupported {
        protocol,
        reason: reason.into(),
    }
}

/// Rejects values that would end the current directive and start another.
pub(crate) fn check_single_line(field: &str, value: &str) -> Result<(), CoreError> {
    if value.contains(['\n', '\r']) {
        return Err(CoreError::Template(format!("{field} contains a line break: {value:?}")));
    }
    Ok(())
}
