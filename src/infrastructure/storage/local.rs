use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    entities::upload::is_valid_bucket,
    storage::object_storage::{is_safe_key, ObjectStorage, StorageError},
};

/// Stores objects as files under `<root>/<bucket>/<key>` and serves them from
/// `<base_url>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl AsRef<Path>, base_url: &str) -> Self {
        LocalStorage {
            root: root.as_ref().to_path_buf(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        if !is_valid_bucket(bucket) {
            return Err(StorageError::InvalidKey(bucket.to_string()));
        }
        if !is_safe_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(bucket).join(key))
    }

    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, bucket, key)
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError> {
        let path = self.object_path(bucket, key)?;
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(bucket, key, content_type, size = bytes.len(), "Stored object");
        Ok(self.public_url(bucket, key))
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(bucket, key)?;
        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound,
            _ => StorageError::Io(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn storage() -> LocalStorage {
        let root = std::env::temp_dir().join(format!("portfolio-cms-storage-{}", Uuid::new_v4()));
        LocalStorage::new(root, "https://janedoe.dev/uploads/")
    }

    #[actix_rt::test]
    async fn put_then_get() {
        let storage = storage();
        let url = storage.put("images", "cover.png", b"png-bytes", "image/png").await.unwrap();
        assert_eq!(url, "https://janedoe.dev/uploads/images/cover.png");
        assert_eq!(storage.get("images", "cover.png").await.unwrap(), b"png-bytes");
    }

    #[actix_rt::test]
    async fn missing_object_is_not_found() {
        let storage = storage();
        assert_eq!(storage.get("images", "nope.png").await, Err(StorageError::NotFound));
    }

    #[actix_rt::test]
    async fn traversal_is_rejected() {
        let storage = storage();
        let result = storage.put("..", "x.png", b"x", "image/png").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
