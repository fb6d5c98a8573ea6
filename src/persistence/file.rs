//! JSON document store on the local filesystem

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{Store, StoreError, decode_list, decode_number};
use crate::highscores::ScoreRecord;

/// All keys live in one JSON object; every write rewrites the file through a
/// temporary sibling so a crash never leaves half a document behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open (or lazily create) a store at `path`.
    ///
    /// An unreadable or corrupt file starts the store empty; the bad file is
    /// replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::read(&path) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Ignoring unreadable score file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<BTreeMap<String, Value>, StoreError> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn get_number(&self, key: &str) -> Result<Option<f64>, StoreError> {
        self.values
            .get(key)
            .map(|v| decode_number(key, v))
            .transpose()
    }

    fn set_number(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        self.flush()
    }

    fn get_list(&self, key: &str) -> Result<Option<Vec<ScoreRecord>>, StoreError> {
        self.values
            .get(key)
            .map(|v| decode_list(key, v))
            .transpose()
    }

    fn set_list(&mut self, key: &str, value: &[ScoreRecord]) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), serde_json::to_value(value)?);
        self.flush()
    }
}
