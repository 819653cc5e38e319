//! Boot Store
//!
//! Storage backends for profiles, groups and opaque config blobs (ignition,
//! cloud-init and generic configs).
//!
//! Every backend implements [`BootStore`]. Reads return owned copies, so
//! callers hold request-scoped snapshots that later writes never alter.
//!
//! # Backends
//!
//! - [`MemoryStore`]: in-process store, used by tests and ephemeral deployments
//! - [`FileStore`]: directory tree of JSON documents and raw blobs
//!
//! # Example
//!
//! ```
//! use boot_model::{Group, Profile};
//! use boot_store::{BootStore, MemoryStore};
//!
//! # async fn example() -> Result<(), boot_store::StoreError> {
//! let store = MemoryStore::new();
//! store.put_profile(Profile { id: "worker".to_string(), ..Default::default() }).await?;
//! store.put_group(Group {
//!     id: "default".to_string(),
//!     profile: "worker".to_string(),
//!     ..Default::default()
//! }).await?;
//!
//! let groups = store.list_groups().await?;
//! assert_eq!(groups[0].profile, "worker");
//! # Ok(())
//! # }
//! ```

pub mod blob;
pub mod error;
pub mod fs;
pub mod memory;
#[path = "trait.rs"]
pub mod store_trait;

pub use blob::BlobKind;
pub use error::StoreError;
pub use fs::FileStore;
pub use memory::MemoryStore;
pub use store_trait::BootStore;
