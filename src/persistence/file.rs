//! File-backed store for native builds

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistError, Store};

/// Stores each key as `<dir>/<key>.txt`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }
}

impl Store for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash never leaves a torn value
        let tmp = self.dir.join(format!("{key}.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dodge-blast-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = FileStore::new(scratch_dir("missing"));
        assert!(store.get_item("nothing").unwrap().is_none());
    }

    #[test]
    fn test_set_then_get() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::new(&dir);
        store.set_item("high_score", "140").unwrap();
        store.set_item("high_score", "150").unwrap();
        assert_eq!(store.get_item("high_score").unwrap().as_deref(), Some("150"));
        let _ = fs::remove_dir_all(dir);
    }
}
