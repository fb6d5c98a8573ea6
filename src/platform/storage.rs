//! Browser LocalStorage backend

use serde_json::Value;

use crate::highscores::ScoreRecord;
use crate::persistence::{Store, StoreError, decode_list, decode_number};

/// [`Store`] over `window.localStorage`. Values are JSON strings.
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".to_string()))
    }

    fn get_raw(key: &str) -> Result<Option<Value>, StoreError> {
        let storage = Self::storage()?;
        let raw = storage
            .get_item(key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
        match raw {
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(Some(value)),
                // Bare strings written by older builds
                Err(_) => Ok(Some(Value::String(json))),
            },
            None => Ok(None),
        }
    }

    fn set_raw(key: &str, value: &Value) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(value)?;
        // Quota errors surface here
        storage
            .set_item(key, &json)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }
}

impl Store for LocalStorageStore {
    fn get_number(&self, key: &str) -> Result<Option<f64>, StoreError> {
        Self::get_raw(key)?
            .map(|v| decode_number(key, &v))
            .transpose()
    }

    fn set_number(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        Self::set_raw(key, &Value::from(value))
    }

    fn get_list(&self, key: &str) -> Result<Option<Vec<ScoreRecord>>, StoreError> {
        Self::get_raw(key)?
            .map(|v| decode_list(key, &v))
            .transpose()
    }

    fn set_list(&mut self, key: &str, value: &[ScoreRecord]) -> Result<(), StoreError> {
        Self::set_raw(key, &serde_json::to_value(value)?)
    }
}
