//! Boot Server
//!
//! HTTP transport for network boot selection, built on `axum`.
//!
//! This server provides:
//! - Boot script endpoints for iPXE (`/boot.ipxe`, `/ipxe`) and GRUB2 (`/grub`)
//! - Config endpoints serving the ignition, cloud-init and generic blobs a
//!   machine's profile references (`/ignition`, `/cloud`, `/generic`)
//! - A JSON API for selection and for managing profiles, groups and blobs (`/v1`)
//! - Health and Prometheus metrics endpoints
//!
//! Machines identify themselves with query parameters (`?mac=...&arch=...`),
//! which become the [`LabelSet`](boot_model::LabelSet) groups are matched against.
//!
//! Match outcomes are reported to a [`MatchObserver`]. The default observers
//! log through `tracing` and count outcomes in Prometheus.

pub mod api;
pub mod error;
pub mod http;
pub mod metrics;
pub mod observer;
pub mod server;
pub mod state;

pub use error::*;
pub use metrics::MetricsObserver;
pub use observer::*;
pub use server::*;
pub use state::AppState;
