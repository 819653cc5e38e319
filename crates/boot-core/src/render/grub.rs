//! GRUB2 configs

use super::{NO_BOOT_MODE, Protocol, Renderer, check_single_line, unsupported};
use crate::error::CoreError;
use crate::resolver::ResolvedBootMode;
use boot_model::{BootModeKind, NetBoot};
use std::fmt::Write;

const DEFAULT_TITLE: &str = "Network Boot";

/// Directive names of one GRUB2 menu entry flavour.
struct MenuEntry {
    suffix: &'static str,
    linux: &'static str,
    initrd: &'static str,
}

const EFI_ENTRY: MenuEntry = MenuEntry {
    suffix: "EFI",
    linux: "linuxefi",
    initrd: "initrdefi",
};

const BIOS_ENTRY: MenuEntry = MenuEntry {
    suffix: "BIOS",
    linux: "linux",
    initrd: "initrd",
};

/// Renders GRUB2 configs with an EFI and a BIOS menu entry.
///
/// GRUB2 configs only express direct netboot. Chain profiles are reported
/// as unsupported.
#[derive(Debug, Clone)]
pub struct GrubRenderer {
    title: String,
}

impl Default for GrubRenderer {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl GrubRenderer {
    /// Create a new GRUB2 renderer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the menu entry title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn write_entry(&self, script: &mut String, entry: &MenuEntry, boot: &NetBoot) -> std::fmt::Result {
        writeln!(script, "menuentry \"{} ({})\" {{", self.title, entry.suffix)?;
        writeln!(script, "echo \"Loading kernel\"")?;
        write!(script, "{} \"{}\"", entry.linux, boot.kernel)?;
        for arg in &boot.args {
            write!(script, " {arg}")?;
        }
        writeln!(script)?;
        writeln!(script, "echo \"Loading initrd\"")?;
        write!(script, "{}", entry.initrd)?;
        for initrd in &boot.initrd {
            write!(script, " \"{initrd}\"")?;
        }
        writeln!(script)?;
        writeln!(script, "}}")
    }

    fn render_net_boot(&self, boot: &NetBoot) -> Result<String, CoreError> {
        check_quotable("menu title", &self.title)?;
        check_quotable("kernel", &boot.kernel)?;
        for arg in &boot.args {
            check_single_line("kernel argument", arg)?;
        }
        for initrd in &boot.initrd {
            check_quotable("initrd", initrd)?;
        }

        let mut script = String::new();
        writeln!(script, "default=0")?;
        writeln!(script, "fallback=1")?;
        writeln!(script, "timeout=1")?;
        self.write_entry(&mut script, &EFI_ENTRY, boot)?;
        self.write_entry(&mut script, &BIOS_ENTRY, boot)?;
        Ok(script)
    }
}

// The menu title and kernel and initrd paths are double-quoted in the config.
fn check_quotable(field: &str, value: &str) -> Result<(), CoreError> {
    check_single_line(field, value)?;
    if value.contains('"') {
        return Err(CoreError::Template(format!("{field} contains a double quote: {value:?}")));
    }
    Ok(())
}

impl Renderer for GrubRenderer {
    fn protocol(&self) -> Protocol {
        Protocol::Grub
    }

    fn supports(&self, kind: BootModeKind) -> bool {
        match kind {
            BootModeKind::NetBoot => true,
            BootModeKind::Chain => false,
        }
    }

    fn render(&self, mode: ResolvedBootMode<'_>) -> Result<String, CoreError> {
        match mode {
            ResolvedBootMode::NetBoot(boot) => self.render_net_boot(boot),
            ResolvedBootMode::Chain(_) => Err(unsupported(
                Protocol::Grub,
                "chain boot mode is not supported for GRUB2",
            )),
            ResolvedBootMode::Unset => Err(unsupported(Protocol::Grub, NO_BOOT_MODE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boot_model::Chain;

    fn net_boot() -> NetBoot {
        NetBoot {
            kernel: "/k".to_string(),
            initrd: vec!["/i1".to_string(), "/i2".to_string()],
            args: vec!["a=1".to_string(), "b=2".to_string()],
        }
    }

    #[test]
    fn test_render_net_boot() {
        let script = GrubRenderer::new()
            .render(ResolvedBootMode::NetBoot(&net_boot()))
            .unwrap();

        let expected = "default=0
fallback=1
timeout=1
menuentry \"Network Boot (EFI)\" {
echo \"Loading kernel\"
linuxefi \"/k\" a=1 b=2
echo \"Loading initrd\"
initrdefi \"/i1\" \"/i2\"
}
menuentry \"Network Boot (BIOS)\" {
echo \"Loading kernel\"
linux \"/k\" a=1 b=2
echo \"Loading initrd\"
initrd \"/i1\" \"/i2\"
}
";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_custom_title() {
        let script = GrubRenderer::new()
            .with_title("Fedora CoreOS")
            .render(ResolvedBootMode::NetBoot(&net_boot()))
            .unwrap();
        assert!(script.contains("menuentry \"Fedora CoreOS (EFI)\" {"));
        assert!(script.contains("menuentry \"Fedora CoreOS (BIOS)\" {"));
    }

    #[test]
    fn test_chain_is_unsupported() {
        let chain = Chain {
            url: "http://x/boot.ipxe".to_string(),
        };
        let renderer = GrubRenderer::new();
        assert!(!renderer.supports(BootModeKind::Chain));

        let result = renderer.render(ResolvedBootMode::Chain(&chain));
        assert!(matches!(
            result,
            Err(CoreError::Unsupported { protocol: Protocol::Grub, .. })
        ));
    }

    #[test]
    fn test_unset_is_unsupported() {
        let result = GrubRenderer::new().render(ResolvedBootMode::Unset);
        assert!(matches!(result, Err(CoreError::Unsupported { .. })));
    }

    #[test]
    fn test_rejects_quote_in_initrd() {
        let mut boot = net_boot();
        boot.initrd.push("/i3\" evil".to_string());
        let result = GrubRenderer::new().render(ResolvedBootMode::NetBoot(&boot));
        assert!(matches!(result, Err(CoreError::Template(_))));
    }

    #[test]
    fn test_rejects_quote_in_title() {
        let result = GrubRenderer::new()
            .with_title("Fedora\" --unrestricted \"CoreOS")
            .render(ResolvedBootMode::NetBoot(&net_boot()));
        assert!(matches!(result, Err(CoreError::Template(_))));
    }
}
