//! iPXE scripts

use super::{NO_BOOT_MODE, Protocol, Renderer, check_single_line, unsupported};
use crate::error::CoreError;
use crate::resolver::ResolvedBootMode;
use boot_model::{BootModeKind, Chain, NetBoot};
use std::fmt::Write;

/// Script that makes iPXE report its machine attributes.
///
/// It chains back to the `ipxe` endpoint with the labels the selector matches
/// on as query parameters. It does not depend on any profile.
pub const IPXE_INSPECT_SCRIPT: &str = "#!ipxe
chain ipxe?uuid=${uuid}&mac=${mac:hexhyp}&domain=${domain}&hostname=${hostname}&serial=${serial}&arch=${buildarch:uristring}
";

const SHEBANG: &str = "#!ipxe";

/// Renders iPXE boot and chain scripts.
#[derive(Debug, Clone, Default)]
pub struct IpxeRenderer;

impl IpxeRenderer {
    /// Create a new iPXE renderer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// The static inspect script.
    #[must_use]
    pub fn inspect_script(&self) -> &'static str {
        IPXE_INSPECT_SCRIPT
    }

    fn render_net_boot(boot: &NetBoot) -> Result<String, CoreError> {
        check_single_line("kernel", &boot.kernel)?;
        for arg in &boot.args {
            check_single_line("kernel argument", arg)?;
        }
        for initrd in &boot.initrd {
            check_single_line("initrd", initrd)?;
        }

        let mut script = String::new();
        writeln!(script, "{SHEBANG}")?;
        write!(script, "kernel {}", boot.kernel)?;
        for arg in &boot.args {
            write!(script, " {arg}")?;
        }
        writeln!(script)?;
        for initrd in &boot.initrd {
            writeln!(script, "initrd {initrd}")?;
        }
        writeln!(script, "boot")?;
        Ok(script)
    }

    fn render_chain(chain: &Chain) -> Result<String, CoreError> {
        check_single_line("chain url", &chain.url)?;

        let mut script = String::new();
        writeln!(script, "{SHEBANG}")?;
        writeln!(script, "chain {}", chain.url)?;
        Ok(script)
    }
}

impl Renderer for IpxeRenderer {
    fn protocol(&self) -> Protocol {
        Protocol::Ipxe
    }

    fn supports(&self, kind: BootModeKind) -> bool {
        match kind {
            BootModeKind::NetBoot | BootModeKind::Chain => true,
        }
    }

    fn render(&self, mode: ResolvedBootMode<'_>) -> Result<String, CoreError> {
        match mode {
            ResolvedBootMode::NetBoot(boot) => Self::render_net_boot(boot),
            ResolvedBootMode::Chain(chain) => Self::render_chain(chain),
            ResolvedBootMode::Unset => Err(unsupported(Protocol::Ipxe, NO_BOOT_MODE)),
        }
    }
}
