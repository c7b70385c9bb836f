//! File-backed storage: one file per key inside a directory.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;

use super::{CartStorage, StorageError};

/// Storage that survives restarts.
///
/// Each key maps to `<dir>/<sanitized-key>.json`. Keys are sanitized by
/// replacing anything outside `[A-Za-z0-9_-]` with `_`, so keys that differ
/// only in punctuation share a file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl CartStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        // Each write gets its own temp file, renamed over the slot once synced.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(path = %path.display(), bytes = value.len(), "Storage slot written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_sanitizes_key() {
        let storage = FileStorage::new("/tmp/carts");
        assert_eq!(
            storage.path_for("@RocketShoes:cart"),
            PathBuf::from("/tmp/carts/_RocketShoes_cart.json")
        );
    }

    #[test]
    fn test_missing_slot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.get_item("@RocketShoes:cart").unwrap().is_none());
    }

    #[test]
    fn test_round_trip_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let storage = FileStorage::new(&nested);

        storage.set_item("@RocketShoes:cart", "[]").unwrap();
        storage.set_item("@RocketShoes:cart", r#"[{"id":1}]"#).unwrap();

        assert_eq!(
            storage.get_item("@RocketShoes:cart").unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        // No temp file left behind.
        let files: Vec<_> = fs::read_dir(&nested).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_concurrent_writers_on_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let values: Vec<String> = (0..32).map(|i| format!(r#"[{{"id":{i}}}]"#)).collect();
        std::thread::scope(|scope| {
            let handles: Vec<_> = values
                .iter()
                .map(|value| scope.spawn(|| storage.set_item("@RocketShoes:cart", value)))
                .collect();
            for handle in handles {
                handle.join().unwrap().unwrap();
            }
        });

        let stored = storage.get_item("@RocketShoes:cart").unwrap().unwrap();
        assert!(values.contains(&stored));
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }
}
