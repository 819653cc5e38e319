//! Store-backed selection
//!
//! Loads groups and profiles from a [`BootStore`] and runs them through the
//! matcher. Every call reads a fresh snapshot, so store writes are picked up
//! by the next request and never affect one in flight.

use crate::error::CoreError;
use crate::matcher::select_group;
use boot_model::{Group, LabelSet, Profile};
use boot_store::{BootStore, StoreError};
use std::sync::Arc;

/// The group a request matched and the profile it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Matched group
    pub group: Group,
    /// Profile referenced by the group
    pub profile: Profile,
}

/// Selects groups and profiles for label sets against a store.
#[derive(Debug)]
pub struct BootSelector<S: BootStore + ?Sized> {
    store: Arc<S>,
}

impl<S: BootStore + ?Sized> Clone for BootSelector<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: BootStore + ?Sized> BootSelector<S> {
    /// Create a selector over `store`
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the first group whose selector `labels` satisfies.
    pub async fn select_group(&self, labels: &LabelSet) -> Result<Group, CoreError> {
        let groups = self.store.list_groups().await?;
        select_group(&groups, labels).cloned()
    }

    /// Returns the matched group together with its profile.
    ///
    /// A group referencing a missing profile yields
    /// [`CoreError::ProfileNotFound`] rather than falling through to a later group.
    pub async fn select(&self, labels: &LabelSet) -> Result<Selection, CoreError> {
        let group = self.select_group(labels).await?;
        let profile = self.get_profile(&group.profile).await?;
        Ok(Selection { group, profile })
    }

    /// Returns the profile of the matched group.
    pub async fn select_profile(&self, labels: &LabelSet) -> Result<Profile, CoreError> {
        Ok(self.select(labels).await?.profile)
    }

    /// Looks up a group by id.
    pub async fn get_group(&self, id: &str) -> Result<Group, CoreError> {
        self.store.get_group(id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => CoreError::GroupNotFound(id.to_string()),
            other => other.into(),
        })
    }

    /// Looks up a profile by id.
    pub async fn get_profile(&self, id: &str) -> Result<Profile, CoreError> {
        self.store.get_profile(id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => CoreError::ProfileNotFound(id.to_string()),
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boot_model::{BootMode, NetBoot};
    use boot_store::MemoryStore;

    fn profile(id: &str) -> Profile {
        Profile {
            id: id.to_string(),
            boot_mode: Some(BootMode::NetBoot(NetBoot {
                kernel: format!("/{id}/vmlinuz"),
                initrd: vec![format!("/{id}/initrd.img")],
                args: vec![],
            })),
            ..Default::default()
        }
    }

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

    async fn selector() -> BootSelector<MemoryStore> {
        let store = MemoryStore::with_contents(
            [profile("worker"), profile("installer")],
            [
                group("x86", "worker", &[("arch", "x86_64")]),
                group("dangling", "missing", &[("arch", "arm64")]),
                group("default", "installer", &[]),
            ],
        )
        .await
        .unwrap();
        BootSelector::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_select_profile() {
        let selector = selector().await;

        let labels = LabelSet::from_query_pairs([("arch", "x86_64")]);
        assert_eq!(selector.select_profile(&labels).await.unwrap().id, "worker");

        let labels = LabelSet::from_query_pairs([("arch", "riscv64")]);
        let selection = selector.select(&labels).await.unwrap();
        assert_eq!(selection.group.id, "default");
        assert_eq!(selection.profile.id, "installer");
    }

    #[tokio::test]
    async fn test_dangling_profile_reference() {
        let selector = selector().await;
        let labels = LabelSet::from_query_pairs([("arch", "arm64")]);

        let result = selector.select_profile(&labels).await;
        assert!(matches!(result, Err(CoreError::ProfileNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_no_match_on_empty_store() {
        let selector = BootSelector::new(Arc::new(MemoryStore::new()));
        let result = selector.select_group(&LabelSet::new()).await;
        assert!(matches!(result, Err(CoreError::NoMatch)));
    }

    #[tokio::test]
    async fn test_lookups_by_id() {
        let selector = selector().await;
        assert_eq!(selector.get_group("x86").await.unwrap().profile, "worker");
        assert!(matches!(
            selector.get_group("nope").await,
            Err(CoreError::GroupNotFound(id)) if id == "nope"
        ));
        assert!(matches!(
            selector.get_profile("nope").await,
            Err(CoreError::ProfileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_works_with_trait_objects() {
        let store: Arc<dyn BootStore> = Arc::new(MemoryStore::with_contents([profile("worker")], [group("all", "worker", &[])]).await.unwrap());
        let selector = BootSelector::new(store);
        assert_eq!(selector.select_profile(&LabelSet::new()).await.unwrap().id, "worker");
    }
}
