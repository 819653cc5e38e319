//! Daemon configuration
//!
//! Read from environment variables:
//!
//! - `BOOTD_ADDRESS`: HTTP listen address (default `0.0.0.0:8080`)
//! - `BOOTD_DATA_DIR`: filesystem store root; the in-memory store is used when unset
//! - `BOOTD_ASSETS_DIR`: directory served under `/assets`
//! - `BOOTD_GRUB_TITLE`: GRUB2 menu entry title (default `Network Boot`)

use crate::error::DaemonError;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_GRUB_TITLE: &str = "Network Boot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: SocketAddr,
    pub data_dir: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub grub_title: String,
}

impl Config {
    pub fn from_env() -> Result<Self, DaemonError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DaemonError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let address = var("BOOTD_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let address = address.parse().map_err(|e| {
            DaemonError::InvalidConfig(format!("BOOTD_ADDRESS {address:?} is not a socket address: {e}"))
        })?;

        let data_dir = var("BOOTD_DATA_DIR").map(PathBuf::from);
        if let Some(dir) = &data_dir {
            check_dir("BOOTD_DATA_DIR", dir)?;
        }
        let assets_dir = var("BOOTD_ASSETS_DIR").map(PathBuf::from);
        if let Some(dir) = &assets_dir {
            check_dir("BOOTD_ASSETS_DIR", dir)?;
        }

        Ok(Self {
            address,
            data_dir,
            assets_dir,
            grub_title: var("BOOTD_GRUB_TITLE").unwrap_or_else(|| DEFAULT_GRUB_TITLE.to_string()),
        })
    }
}

fn check_dir(name: &str, dir: &std::path::Path) -> Result<(), DaemonError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(DaemonError::InvalidConfig(format!(
            "{name} {} is not a directory",
            dir.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, DaemonError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.address, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_dir, None);
        assert_eq!(config.assets_dir, None);
        assert_eq!(config.grub_title, "Network Boot");
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();
        let config = config(&[
            ("BOOTD_ADDRESS", "127.0.0.1:9090"),
            ("BOOTD_DATA_DIR", data_dir),
            ("BOOTD_GRUB_TITLE", "Flatcar"),
        ])
        .unwrap();

        assert_eq!(config.address.port(), 9090);
        assert_eq!(config.data_dir.as_deref(), Some(dir.path()));
        assert_eq!(config.grub_title, "Flatcar");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("BOOTD_ADDRESS", "localhost")]),
            Err(DaemonError::InvalidConfig(_))
        ));
        assert!(matches!(
            config(&[("BOOTD_DATA_DIR", "/nonexistent/bootd")]),
            Err(DaemonError::InvalidConfig(_))
        ));
    }
}
