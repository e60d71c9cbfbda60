//! In-memory storage.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::Result;
use crate::error::StorageError;
use crate::traits::{SessionStorage, StorageOp};

/// Process-local [`SessionStorage`]. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a storage with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::Lock)?;
        Ok(entries.get(key).cloned())
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Lock)?;
        for op in ops {
            match op {
                StorageOp::Set { key, value } => {
                    entries.insert(key.clone(), value.clone());
                }
                StorageOp::Remove { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}
