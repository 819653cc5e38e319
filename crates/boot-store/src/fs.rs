//! Filesystem store
//!
//! Reads and writes a directory tree:
//!
//! ```text
//! <root>/profiles/<id>.json
//! <root>/groups/<id>.json
//! <root>/ignition/<id>
//! <root>/cloud/<id>
//! <root>/generic/<id>
//! ```
//!
//! Groups are listed in file name order, which is their precedence. Prefix
//! file names (`10-storage-nodes`, `90-default`) to control matching order.
//! Writes go to a uniquely named temporary file that is renamed into place, so
//! readers never see a half-written document and concurrent writers never
//! collide.

use crate::blob::BlobKind;
use crate::error::{EntityKind, StoreError, check_id};
use crate::store_trait::BootStore;
use boot_model::{Group, Profile};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

const PROFILES_DIR: &str = "profiles";
const GROUPS_DIR: &str = "groups";
const DOCUMENT_EXTENSION: &str = "json";

/// Directory-backed [`BootStore`].
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`.
    ///
    /// Missing subdirectories are treated as empty and created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, dir: &str, id: &str) -> Result<PathBuf, StoreError> {
        check_id(id)?;
        Ok(self.root.join(dir).join(format!("{id}.{DOCUMENT_EXTENSION}")))
    }

    fn blob_path(&self, kind: BlobKind, id: &str) -> Result<PathBuf, StoreError> {
        check_id(id)?;
        Ok(self.root.join(kind.as_str()).join(id))
    }

    /// Lists `*.json` files in a subdirectory, sorted by file name.
    async fn list_documents(&self, dir: &str) -> Result<Vec<PathBuf>, StoreError> {
        let mut entries = match fs::read_dir(self.root.join(dir)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_document = path
                .extension()
                .is_some_and(|ext| ext == DOCUMENT_EXTENSION);
            if is_document && entry.file_type().await?.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

async fn read_existing(path: &Path, kind: EntityKind, id: &str) -> Result<Vec<u8>, StoreError> {
    match fs::read(path).await {
        Ok(data) => Ok(data),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::not_found(kind, id)),
        Err(e) => Err(e.into()),
    }
}

async fn remove_existing(path: &Path, kind: EntityKind, id: &str) -> Result<(), StoreError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::not_found(kind, id)),
        Err(e) => Err(e.into()),
    }
}

/// Writes `data` to a uniquely named file next to `path` and renames it into place.
///
/// Concurrent writers of the same document each get their own temporary file;
/// the last rename wins.
async fn write_atomic(path: &Path, data: Vec<u8>) -> Result<(), StoreError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).await?;

    let dir = parent.to_path_buf();
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(".")
            .suffix(".tmp")
            .tempfile_in(&dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(std::io::Error::other)??;

    debug!("Wrote {}", path.display());
    Ok(())
}

#[async_trait::async_trait]
impl BootStore for FileStore {
    async fn list_groups(&self) -> Result<Vec<Group>, StoreError> {
        let mut groups = Vec::new();
        for path in self.list_documents(GROUPS_DIR).await? {
            let group = Group::parse(&fs::read(&path).await?)?;
            let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned());
            if stem.as_deref() != Some(group.id.as_str()) {
                warn!("Group file {} declares id {:?}", path.display(), group.id);
            }
            groups.push(group);
        }
        Ok(groups)
    }

    async fn get_group(&self, id: &str) -> Result<Group, StoreError> {
        let path = self.document_path(GROUPS_DIR, id)?;
        let data = read_existing(&path, EntityKind::Group, id).await?;
        Ok(Group::parse(&data)?)
    }

    async fn put_group(&self, group: Group) -> Result<(), StoreError> {
        group.validate()?;
        let path = self.document_path(GROUPS_DIR, &group.id)?;
        write_atomic(&path, serde_json::to_vec_pretty(&group)?).await
    }

    async fn delete_group(&self, id: &str) -> Result<(), StoreError> {
        let path = self.document_path(GROUPS_DIR, id)?;
        remove_existing(&path, EntityKind::Group, id).await
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let mut profiles = Vec::new();
        for path in self.list_documents(PROFILES_DIR).await? {
            profiles.push(Profile::parse(&fs::read(&path).await?)?);
        }
        Ok(profiles)
    }

    async fn get_profile(&self, id: &str) -> Result<Profile, StoreError> {
        let path = self.document_path(PROFILES_DIR, id)?;
        let data = read_existing(&path, EntityKind::Profile, id).await?;
        Ok(Profile::parse(&data)?)
    }

    async fn put_profile(&self, profile: Profile) -> Result<(), StoreError> {
        profile.validate()?;
        let path = self.document_path(PROFILES_DIR, &profile.id)?;
        write_atomic(&path, serde_json::to_vec_pretty(&profile)?).await
    }

    async fn delete_profile(&self, id: &str) -> Result<(), StoreError> {
        let path = self.document_path(PROFILES_DIR, id)?;
        remove_existing(&path, EntityKind::Profile, id).await
    }

    async fn get_blob(&self, kind: BlobKind, id: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.blob_path(kind, id)?;
        read_existing(&path, EntityKind::Blob(kind), id).await
    }

    async fn put_blob(&self, kind: BlobKind, id: &str, data: Vec<u8>) -> Result<(), StoreError> {
        let path = self.blob_path(kind, id)?;
        write_atomic(&path, data).await
    }

    async fn delete_blob(&self, kind: BlobKind, id: &str) -> Result<(), StoreError> {
        let path = self.blob_path(kind, id)?;
        remove_existing(&path, EntityKind::Blob(kind), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boot_model::{BootMode, Chain, ModelError};

    fn catch_all(id: &str, profile: &str) -> Group {
        Group {
            id: id.to_string(),
            profile: profile.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.list_groups().await.unwrap().is_empty());
        assert!(store.list_profiles().await.unwrap().is_empty());
        assert!(store.get_profile("worker").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let profile = Profile {
            id: "chained".to_string(),
            boot_mode: Some(BootMode::Chain(Chain {
                url: "http://x/boot.ipxe".to_string(),
            })),
            ..Default::default()
        };

        store.put_profile(profile.clone()).await.unwrap();
        assert!(dir.path().join("profiles/chained.json").is_file());
        assert_eq!(store.get_profile("chained").await.unwrap(), profile);

        store.delete_profile("chained").await.unwrap();
        assert!(store.get_profile("chained").await.unwrap_err().is_not_found());
        assert!(store.delete_profile("chained").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_groups_listed_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.put_group(catch_all("90-default", "installer")).await.unwrap();
        store.put_group(catch_all("10-storage", "storage")).await.unwrap();
        // Non-document files are ignored
        std::fs::write(dir.path().join("groups/README"), "notes").unwrap();

        let ids: Vec<String> = store.list_groups().await.unwrap().into_iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["10-storage", "90-default"]);
    }

    #[tokio::test]
    async fn test_rejects_escaping_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let result = store.put_blob(BlobKind::Generic, "../outside", b"x".to_vec()).await;
        assert!(matches!(result, Err(StoreError::InvalidId(_))));
        assert!(matches!(store.get_group("..").await, Err(StoreError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("profiles")).unwrap();
        std::fs::write(dir.path().join("profiles/broken.json"), "{\"id\": ").unwrap();
        let store = FileStore::new(dir.path());

        let result = store.get_profile("broken").await;
        assert!(matches!(result, Err(StoreError::Model(ModelError::Malformed(_)))));
    }

    #[tokio::test]
    async fn test_blob_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.put_blob(BlobKind::Cloud, "worker.yaml", b"#cloud-config\n".to_vec()).await.unwrap();
        assert!(dir.path().join("cloud/worker.yaml").is_file());
        assert_eq!(store.get_blob(BlobKind::Cloud, "worker.yaml").await.unwrap(), b"#cloud-config\n");

        store.delete_blob(BlobKind::Cloud, "worker.yaml").await.unwrap();
        assert!(store.get_blob(BlobKind::Cloud, "worker.yaml").await.unwrap_err().is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_to_one_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let payloads: Vec<Vec<u8>> = (0..8u8).map(|i| vec![b'a' + i; 64 * 1024]).collect();

        for _ in 0..5 {
            let mut tasks = Vec::new();
            for payload in &payloads {
                let store = store.clone();
                let payload = payload.clone();
                tasks.push(tokio::spawn(async move {
                    store.put_blob(BlobKind::Generic, "shared", payload).await
                }));
            }
            for task in tasks {
                task.await.unwrap().unwrap();
            }

            let stored = store.get_blob(BlobKind::Generic, "shared").await.unwrap();
            assert!(payloads.contains(&stored), "stored blob mixes writers");
        }

        let names: Vec<_> = std::fs::read_dir(dir.path().join("generic"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["shared".to_string()]);
    }
}
