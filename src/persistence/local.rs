//! Browser LocalStorage store

use super::{PersistError, Store};

/// Thin wrapper over `window.localStorage`
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores and settings will not persist");
        }
        Self { storage }
    }
}

impl Store for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistError> {
        let storage = self.storage.as_ref().ok_or(PersistError::Unavailable)?;
        storage.get_item(key).map_err(|_| PersistError::Unavailable)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        let storage = self.storage.as_ref().ok_or(PersistError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| PersistError::Unavailable)
    }
}
