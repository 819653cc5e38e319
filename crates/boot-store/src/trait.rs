//! BootStore trait
//!
//! Abstracts the storage backend so the selector and the transports can run
//! against the filesystem store in production and the memory store in tests.

use crate::blob::BlobKind;
use crate::error::StoreError;
use boot_model::{Group, Profile};

/// Storage operations for profiles, groups and config blobs.
///
/// Reads return owned copies; a reader never observes a later write through
/// a value it already holds. `list_groups` returns groups in precedence order
/// and must never return a torn listing under concurrent writers.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait BootStore: Send + Sync {
    // Groups
    async fn list_groups(&self) -> Result<Vec<Group>, StoreError>;
    async fn get_group(&self, id: &str) -> Result<Group, StoreError>;
    async fn put_group(&self, group: Group) -> Result<(), StoreError>;
    async fn delete_group(&self, id: &str) -> Result<(), StoreError>;

    // Profiles
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    async fn get_profile(&self, id: &str) -> Result<Profile, StoreError>;
    async fn put_profile(&self, profile: Profile) -> Result<(), StoreError>;
    async fn delete_profile(&self, id: &str) -> Result<(), StoreError>;

    // Config blobs
    async fn get_blob(&self, kind: BlobKind, id: &str) -> Result<Vec<u8>, StoreError>;
    async fn put_blob(&self, kind: BlobKind, id: &str, data: Vec<u8>) -> Result<(), StoreError>;
    async fn delete_blob(&self, kind: BlobKind, id: &str) -> Result<(), StoreError>;
}
