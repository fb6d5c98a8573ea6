//! Key-value persistence port
//!
//! The simulation never touches a concrete storage mechanism. It talks to a
//! [`Store`], a narrow string-keyed interface for scalar numbers and score
//! lists. Backends:
//! - [`MemoryStore`]: in-process map (tests, headless runs)
//! - [`JsonFileStore`]: single JSON document on disk (native)
//! - `platform::LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Values are held as JSON so every backend shares the same decoding rules.

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::highscores::ScoreRecord;

/// Storage failures. The engine logs and swallows all of these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt value under `{key}`: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage key for an engine's best score
pub fn best_score_key(engine: &str) -> String {
    format!("best-score:{engine}")
}

/// Storage key for an engine's leaderboard
pub fn leaderboard_key(engine: &str) -> String {
    format!("leaderboard:{engine}")
}

/// String-keyed persistence consumed by the engines
pub trait Store {
    fn get_number(&self, key: &str) -> Result<Option<f64>, StoreError>;
    fn set_number(&mut self, key: &str, value: f64) -> Result<(), StoreError>;
    fn get_list(&self, key: &str) -> Result<Option<Vec<ScoreRecord>>, StoreError>;
    fn set_list(&mut self, key: &str, value: &[ScoreRecord]) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn get_number(&self, key: &str) -> Result<Option<f64>, StoreError> {
        (**self).get_number(key)
    }

    fn set_number(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        (**self).set_number(key, value)
    }

    fn get_list(&self, key: &str) -> Result<Option<Vec<ScoreRecord>>, StoreError> {
        (**self).get_list(key)
    }

    fn set_list(&mut self, key: &str, value: &[ScoreRecord]) -> Result<(), StoreError> {
        (**self).set_list(key, value)
    }
}

/// Decode a stored scalar. Numbers written as strings (LocalStorage habit)
/// are accepted too.
pub(crate) fn decode_number(key: &str, value: &Value) -> Result<f64, StoreError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| StoreError::Corrupt {
            key: key.to_string(),
            reason: format!("expected a number, found {value}"),
        })
}

/// Decode a stored score list
pub(crate) fn decode_list(key: &str, value: &Value) -> Result<Vec<ScoreRecord>, StoreError> {
    serde_json::from_value(value.clone()).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an arbitrary raw value under a key (e.g. to simulate corruption)
    pub fn insert_raw(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

impl Store for MemoryStore {
    fn get_number(&self, key: &str) -> Result<Option<f64>, StoreError> {
        self.values
            .get(key)
            .map(|v| decode_number(key, v))
            .transpose()
    }

    fn set_number(&mut self, key: &str, value: f64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        Ok(())
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
        Ok(())
    }
}
