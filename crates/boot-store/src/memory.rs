//! In-memory store
//!
//! Keeps groups in insertion order. Replacing an existing group keeps its
//! position, so re-registering a rule never changes precedence.

use crate::blob::BlobKind;
use crate::error::{EntityKind, StoreError, check_id};
use crate::store_trait::BootStore;
use boot_model::{Group, Profile};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory [`BootStore`].
///
/// Cloning is cheap and clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    groups: Arc<RwLock<Vec<Group>>>,
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
    blobs: Arc<RwLock<HashMap<(BlobKind, String), Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with profiles and an ordered list of groups.
    ///
    /// Documents are validated as if they were written one by one.
    pub async fn with_contents(
        profiles: impl IntoIterator<Item = Profile>,
        groups: impl IntoIterator<Item = Group>,
    ) -> Result<Self, StoreError> {
        let store = Self::new();
        for profile in profiles {
            store.put_profile(profile).await?;
        }
        for group in groups {
            store.put_group(group).await?;
        }
        Ok(store)
    }
}

#[async_trait::async_trait]
impl BootStore for MemoryStore {
    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.groups.read().await.clone())
    }

    async fn get_group(&self, id: &str) -> Result<Group, StoreError> {
        self.groups
            .read()
            .await
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Group, id))
    }

    async fn put_group(&self, group: Group) -> Result<(), StoreError> {
        group.validate()?;
        let mut groups = self.groups.write().await;
        if let Some(existing) = groups.iter_mut().find(|g| g.id == group.id) {
            debug!("Replacing group {}", group.id);
            *existing = group;
        } else {
            debug!("Appending group {}", group.id);
            groups.push(group);
        }
        Ok(())
    }

    async fn delete_group(&self, id: &str) -> Result<(), StoreError> {
        let mut groups = self.groups.write().await;
        let position = groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Group, id))?;
        groups.remove(position);
        Ok(())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let mut profiles: Vec<Profile> = self.profiles.read().await.values().cloned().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }

    async fn get_profile(&self, id: &str) -> Result<Profile, StoreError> {
        self.profiles
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Profile, id))
    }

    async fn put_profile(&self, profile: Profile) -> Result<(), StoreError> {
        profile.validate()?;
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile);
        Ok(())
    }

    async fn delete_profile(&self, id: &str) -> Result<(), StoreError> {
        self.profiles
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(EntityKind::Profile, id))
    }

    async fn get_blob(&self, kind: BlobKind, id: &str) -> Result<Vec<u8>, StoreError> {
        self.blobs
            .read()
            .await
            .get(&(kind, id.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(EntityKind::Blob(kind), id))
    }

    async fn put_blob(&self, kind: BlobKind, id: &str, data: Vec<u8>) -> Result<(), StoreError> {
        check_id(id)?;
        self.blobs.write().await.insert((kind, id.to_string()), data);
        Ok(())
    }

    async fn delete_blob(&self, kind: BlobKind, id: &str) -> Result<(), StoreError> {
        self.blobs
            .write()
            .await
            .remove(&(kind, id.to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(EntityKind::Blob(kind), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boot_model::{BootMode, ModelError, NetBoot};

    fn group(id: &str, profile: &str, selector: &[(&str, &str)]) -> Group {
        Group {
            id: id.to_string(),
            name: None,
            profile: profile.to_string(),
            selector: selector
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_groups_keep_insertion_order() {
        let store = MemoryStore::new();
        store.put_group(group("b", "p", &[("arch", "x86_64")])).await.unwrap();
        store.put_group(group("a", "p", &[])).await.unwrap();

        let ids: Vec<String> = store.list_groups().await.unwrap().into_iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_replacing_group_keeps_position() {
        let store = MemoryStore::new();
        store.put_group(group("first", "p1", &[])).await.unwrap();
        store.put_group(group("second", "p2", &[])).await.unwrap();
        store.put_group(group("first", "p3", &[("arch", "arm64")])).await.unwrap();

        let groups = store.list_groups().await.unwrap();
        assert_eq!(groups[0].id, "first");
        assert_eq!(groups[0].profile, "p3");
        assert_eq!(groups[1].id, "second");
    }

    #[tokio::test]
    async fn test_put_validates() {
        let store = MemoryStore::new();
        let result = store.put_profile(Profile::default()).await;
        assert!(matches!(result, Err(StoreError::Model(ModelError::IdRequired))));

        let result = store.put_group(group("g", "", &[])).await;
        assert!(matches!(result, Err(StoreError::Model(ModelError::ProfileRequired))));
    }

    #[tokio::test]
    async fn test_not_found() {
        let store = MemoryStore::new();
        assert!(store.get_profile("missing").await.unwrap_err().is_not_found());
        assert!(store.get_group("missing").await.unwrap_err().is_not_found());
        assert!(store.delete_group("missing").await.unwrap_err().is_not_found());
        assert!(store.get_blob(BlobKind::Cloud, "missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_reads_are_snapshots() {
        let profile = Profile {
            id: "worker".to_string(),
            boot_mode: Some(BootMode::NetBoot(NetBoot {
                kernel: "/k".to_string(),
                initrd: vec!["/i".to_string()],
                args: vec![],
            })),
            ..Default::default()
        };
        let store = MemoryStore::with_contents([profile], Vec::new()).await.unwrap();

        let mut held = store.get_profile("worker").await.unwrap();
        if let Some(BootMode::NetBoot(boot)) = held.boot_mode.as_mut() {
            boot.initrd.push("/other".to_string());
        }

        let fresh = store.get_profile("worker").await.unwrap();
        assert_eq!(fresh.net_boot().unwrap().initrd, vec!["/i"]);
    }

    #[tokio::test]
    async fn test_blob_crud() {
        let store = MemoryStore::new();
        store.put_blob(BlobKind::Ignition, "a.ign", b"{}".to_vec()).await.unwrap();
        assert_eq!(store.get_blob(BlobKind::Ignition, "a.ign").await.unwrap(), b"{}");
        // Kinds are separate namespaces
        assert!(store.get_blob(BlobKind::Generic, "a.ign").await.is_err());

        store.delete_blob(BlobKind::Ignition, "a.ign").await.unwrap();
        assert!(store.get_blob(BlobKind::Ignition, "a.ign").await.is_err());
    }
}
