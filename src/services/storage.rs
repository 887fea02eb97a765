use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The two partitions files move through: raw uploads and processed results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Uploads,
    Processed,
}

impl Area {
    pub const ALL: [Area; 2] = [Area::Uploads, Area::Processed];

    pub fn dir_name(&self) -> &'static str {
        match self {
            Area::Uploads => "uploads",
            Area::Processed => "processed",
        }
    }
}

/// Local-disk storage split into an uploads area and a processed area.
///
/// Files are written once under a generated name and never renamed; the
/// retention sweeper is the only thing that removes them.
pub struct StorageAreas {
    root: PathBuf,
}

impl StorageAreas {
    /// Opens the storage root, creating both area directories if absent.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        for area in Area::ALL {
            tokio::fs::create_dir_all(root.join(area.dir_name())).await?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn area_dir(&self, area: Area) -> PathBuf {
        self.root.join(area.dir_name())
    }

    /// Absolute path of a named file within an area
    pub fn path_of(&self, area: Area, name: &str) -> PathBuf {
        self.area_dir(area).join(name)
    }

    /// Relative address under which the file is served statically
    pub fn public_path(&self, area: Area, name: &str) -> String {
        format!("/static/{}/{}", area.dir_name(), name)
    }

    /// Writes bytes to `area/name`, overwriting any existing file.
    ///
    /// Generated names make overwrites vanishingly unlikely in practice.
    pub async fn store(&self, area: Area, name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.path_of(area, name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Reads a file back; `NotFound` usually means the sweeper got there first.
    pub async fn read(&self, area: Area, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_of(area, name);
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    /// Lists regular files in an area with their modification times.
    ///
    /// Entries whose metadata cannot be read (deleted mid-listing) are
    /// skipped rather than failing the listing.
    pub async fn list_files(&self, area: Area) -> Result<Vec<(String, SystemTime)>, StorageError> {
        let mut entries = tokio::fs::read_dir(self.area_dir(area)).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let Ok(modified) = metadata.modified() else {
                continue;
            };
            files.push((entry.file_name().to_string_lossy().into_owned(), modified));
        }

        Ok(files)
    }

    pub async fn delete(&self, area: Area, name: &str) -> Result<(), StorageError> {
        let path = self.path_of(area, name);
        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAreas::open(dir.path()).await.unwrap();

        let path = storage
            .store(Area::Uploads, "abc.jpg", b"jpeg bytes")
            .await
            .unwrap();
        assert!(path.exists());

        let bytes = storage.read(Area::Uploads, "abc.jpg").await.unwrap();
        assert_eq!(bytes, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAreas::open(dir.path()).await.unwrap();

        let err = storage.read(Area::Processed, "gone.png").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_areas_are_partitioned() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAreas::open(dir.path()).await.unwrap();

        storage.store(Area::Uploads, "a.jpg", b"x").await.unwrap();
        assert!(storage.read(Area::Processed, "a.jpg").await.is_err());

        let uploads = storage.list_files(Area::Uploads).await.unwrap();
        let processed = storage.list_files(Area::Processed).await.unwrap();
        assert_eq!(uploads.len(), 1);
        assert!(processed.is_empty());
    }

    #[tokio::test]
    async fn test_public_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAreas::open(dir.path()).await.unwrap();

        assert_eq!(
            storage.public_path(Area::Uploads, "abc.jpg"),
            "/static/uploads/abc.jpg"
        );
        assert_eq!(
            storage.public_path(Area::Processed, "abc.png"),
            "/static/processed/abc.png"
        );
    }

    #[tokio::test]
    async fn test_list_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageAreas::open(dir.path()).await.unwrap();

        tokio::fs::create_dir(storage.path_of(Area::Uploads, "subdir"))
            .await
            .unwrap();
        storage.store(Area::Uploads, "a.png", b"x").await.unwrap();

        let files = storage.list_files(Area::Uploads).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "a.png");
    }
}
