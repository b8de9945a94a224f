use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Objects are written to a hidden temp file first and then published under
/// their final name with a hard link, which fails instead of replacing an
/// existing file. The temp file is always removed afterwards, so an interrupted
/// or failed write never leaves a partial object under the storage root.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a stored name to a filesystem path.
    ///
    /// Names are flat: no separators, no traversal, no hidden files.
    fn name_to_path(&self, stored_name: &str) -> StorageResult<PathBuf> {
        if stored_name.is_empty()
            || stored_name.contains('/')
            || stored_name.contains('\\')
            || stored_name.contains("..")
            || stored_name.starts_with('.')
        {
            return Err(StorageError::InvalidName(stored_name.to_string()));
        }

        Ok(self.base_path.join(stored_name))
    }

    fn temp_path(&self, stored_name: &str) -> PathBuf {
        self.base_path
            .join(format!(".{}.{}.part", stored_name, Uuid::new_v4()))
    }

    async fn write_and_publish(
        &self,
        stored_name: &str,
        temp_path: &Path,
        path: &Path,
        data: &[u8],
    ) -> StorageResult<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp_path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to sync file {}: {}",
                temp_path.display(),
                e
            ))
        })?;
        drop(file);

        match fs::hard_link(temp_path, path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(StorageError::AlreadyExists(stored_name.to_string()))
            }
            Err(e) => Err(StorageError::UploadFailed(format!(
                "Failed to publish file {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, stored_name: &str, data: Bytes) -> StorageResult<StoredObject> {
        let path = self.name_to_path(stored_name)?;
        let temp_path = self.temp_path(stored_name);
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let result = self
            .write_and_publish(stored_name, &temp_path, &path, &data)
            .await;

        if let Err(e) = fs::remove_file(&temp_path).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    error = %e,
                    path = %temp_path.display(),
                    "Failed to remove temp file"
                );
            }
        }
        result?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(StoredObject {
            name: stored_name.to_string(),
            location: self.location(stored_name),
            size,
        })
    }

    async fn read(&self, stored_name: &str) -> StorageResult<Vec<u8>> {
        let path = self.name_to_path(stored_name)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, stored_name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(stored_name)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn location(&self, stored_name: &str) -> String {
        self.base_path.join(stored_name).display().to_string()
    }

    async fn health_check(&self) -> StorageResult<()> {
        let meta = fs::metadata(&self.base_path).await?;
        if !meta.is_dir() {
            return Err(StorageError::ConfigError(format!(
                "{} is not a directory",
                self.base_path.display()
            )));
        }
        if meta.permissions().readonly() {
            return Err(StorageError::ConfigError(format!(
                "{} is read-only",
                self.base_path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn entries(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        let mut read_dir = fs::read_dir(dir).await.unwrap();
        while let Some(entry) = read_dir.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names
    }

    #[tokio::test]
    async fn test_local_storage_store_read() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let data = Bytes::from_static(b"test data");
        let stored = storage.store("abc.txt", data.clone()).await.unwrap();

        assert_eq!(stored.name, "abc.txt");
        assert_eq!(stored.size, 9);
        assert_eq!(
            stored.location,
            dir.path().join("abc.txt").display().to_string()
        );
        assert_eq!(storage.read("abc.txt").await.unwrap(), data.to_vec());
        assert_eq!(entries(dir.path()).await, vec!["abc.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_store_creates_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");
        let storage = LocalStorage::new(&root).await.unwrap();

        storage
            .store("a.pdf", Bytes::from_static(b"%PDF"))
            .await
            .unwrap();
        assert!(root.join("a.pdf").exists());
    }

    #[tokio::test]
    async fn test_store_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .store("same.txt", Bytes::from_static(b"first"))
            .await
            .unwrap();
        let result = storage
            .store("same.txt", Bytes::from_static(b"second"))
            .await;

        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(storage.read("same.txt").await.unwrap(), b"first".to_vec());
        assert_eq!(entries(dir.path()).await, vec!["same.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_nothing() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("uploads");
        let storage = LocalStorage::new(&root).await.unwrap();
        fs::remove_dir(&root).await.unwrap();

        let result = storage.store("gone.txt", Bytes::from_static(b"x")).await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(!root.exists());
        assert!(storage.health_check().await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_names_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        for name in ["", "../etc/passwd", "a/b.txt", "a\\b.txt", ".hidden"] {
            let result = storage.store(name, Bytes::from_static(b"x")).await;
            assert!(
                matches!(result, Err(StorageError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }

        let result = storage.read("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
        assert!(entries(dir.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_read_missing() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage.read("missing.txt").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_exists_and_health_check() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        assert!(!storage.exists("x.txt").await.unwrap());
        storage.store("x.txt", Bytes::from_static(b"x")).await.unwrap();
        assert!(storage.exists("x.txt").await.unwrap());
        assert!(storage.health_check().await.is_ok());
    }
}
