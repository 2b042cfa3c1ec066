//! Object store backed by the local filesystem
//!
//! Buckets are directories under a root, keys are file names inside them.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::domain::interfaces::ObjectStore;
use crate::shared::errors::StoreError;
use crate::shared::utils::truncate_body;

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let invalid = key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key == "."
            || key == "..";
        if invalid {
            return Err(StoreError::Retrieval(format!("Invalid object key: {:?}", key)));
        }
        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(bucket, key)?;
        info!("Reading object {}/{}", bucket, key);

        match fs::read(&path).await {
            Ok(body) => {
                info!("Read {} bytes from {}", body.len(), path.display());
                Ok(body)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(format!(
                "NoSuchKey: {}/{}",
                bucket, key
            ))),
            Err(e) => Err(StoreError::Retrieval(format!("{}: {}", path.display(), e))),
        }
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        info!(
            "Writing object {}/{}: {}",
            bucket,
            key,
            truncate_body(&body, 100, 100)
        );

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::Retrieval(format!("{}: {}", dir.display(), e)))?;
        }

        // Write then rename so readers never see a half-written snapshot
        let staging = staging_path(&path);
        fs::write(&staging, &body)
            .await
            .map_err(|e| StoreError::Retrieval(format!("{}: {}", staging.display(), e)))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| StoreError::Retrieval(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let err = store.get_object("prices", "-33.865.151.209.json").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_put_then_get_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        store.put_object("prices", "k.json", b"{\"a\":1}".to_vec()).await.unwrap();
        store.put_object("prices", "k.json", b"{\"a\":2}".to_vec()).await.unwrap();

        let body = store.get_object("prices", "k.json").await.unwrap();
        assert_eq!(body, b"{\"a\":2}".to_vec());
        assert!(!dir.path().join("prices").join("k.json.partial").exists());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let err = store.get_object("prices", "../secrets").await.unwrap_err();
        assert!(matches!(err, StoreError::Retrieval(_)));
    }

    #[tokio::test]
    async fn test_unreadable_object_is_retrieval_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("prices").join("k.json")).unwrap();
        let store = FsObjectStore::new(dir.path());

        let err = store.get_object("prices", "k.json").await.unwrap_err();
        assert!(matches!(err, StoreError::Retrieval(_)));
    }
}
