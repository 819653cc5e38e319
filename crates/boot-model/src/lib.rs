//! Network Boot Model
//!
//! Data types shared by the boot selection engine, its storage backends and
//! its transports.
//!
//! - [`Profile`]: a validated boot configuration holding at most one [`BootMode`]
//! - [`Group`]: a selector that binds matching machines to a profile
//! - [`LabelSet`]: the per-request machine attributes selectors are matched against
//!
//! Profiles and groups serialize to JSON documents. A profile's boot mode is
//! encoded by which of the `boot` or `chain` fields is present:
//!
//! ```
//! use boot_model::{BootMode, Profile};
//!
//! let profile = Profile::parse(br#"{
//!     "id": "worker",
//!     "boot": { "kernel": "/assets/vmlinuz", "initrd": ["/assets/initrd.img"], "args": ["console=ttyS0"] }
//! }"#).unwrap();
//!
//! profile.validate().unwrap();
//! assert!(matches!(profile.boot_mode, Some(BootMode::NetBoot(_))));
//! ```

pub mod error;
pub mod group;
pub mod labels;
pub mod profile;

pub use error::*;
pub use group::*;
pub use labels::*;
pub use profile::*;
