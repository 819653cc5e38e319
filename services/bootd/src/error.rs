//! Daemon error types.

use boot_server::ServerError;
use thiserror::Error;

/// Errors that stop the boot daemon.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}
