//! Key-value snapshot persistence.
//!
//! Calendar state is saved as three independent values (events,
//! categories, theme), each fully overwritten on every change.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DaybookError, DaybookResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Events,
    Categories,
    Theme,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Events, StorageKey::Categories, StorageKey::Theme];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Events => "events",
            StorageKey::Categories => "categories",
            StorageKey::Theme => "theme",
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            StorageKey::Events => "events.json",
            StorageKey::Categories => "categories.json",
            StorageKey::Theme => "theme",
        }
    }
}

/// Where snapshots go. `read` returns `None` for a key never written.
pub trait SnapshotStorage: Send {
    fn read(&self, key: StorageKey) -> DaybookResult<Option<String>>;
    fn write(&mut self, key: StorageKey, value: &str) -> DaybookResult<()>;
}

/// One file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl Into<PathBuf>) -> DaybookResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            DaybookError::Persistence(format!("Could not create {}: {}", dir.display(), e))
        })?;
        Ok(FileStorage { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: StorageKey) -> DaybookResult<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write(&mut self, key: StorageKey, value: &str) -> DaybookResult<()> {
        let path = self.path(key);
        let temp = path.with_extension("tmp");

        fs::write(&temp, value)
            .and_then(|_| fs::rename(&temp, &path))
            .map_err(|e| {
                DaybookError::Persistence(format!("Could not write {}: {}", path.display(), e))
            })
    }
}

/// In-memory storage, for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<StorageKey, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: StorageKey, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: StorageKey) -> DaybookResult<Option<String>> {
        Ok(self.values.get(&key).cloned())
    }

    fn write(&mut self, key: StorageKey, value: &str) -> DaybookResult<()> {
        self.values.insert(key, value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_reads_back_what_it_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path().join("data")).unwrap();

        assert_eq!(storage.read(StorageKey::Theme).unwrap(), None);
        storage.write(StorageKey::Theme, "dark").unwrap();
        storage.write(StorageKey::Theme, "light").unwrap();
        assert_eq!(storage.read(StorageKey::Theme).unwrap().as_deref(), Some("light"));

        assert!(storage.dir().join("theme").exists());
        assert!(!storage.dir().join("theme.tmp").exists());
    }

    #[test]
    fn keys_map_to_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path()).unwrap();
        for key in StorageKey::ALL {
            storage.write(key, key.as_str()).unwrap();
        }
        assert_eq!(
            fs::read_to_string(dir.path().join("events.json")).unwrap(),
            "events"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("categories.json")).unwrap(),
            "categories"
        );
    }

    #[test]
    fn memory_storage_starts_empty() {
        let storage = MemoryStorage::new().with(StorageKey::Events, "[]");
        assert_eq!(storage.read(StorageKey::Events).unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.read(StorageKey::Categories).unwrap(), None);
    }
}
