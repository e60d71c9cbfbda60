//! Durable key-value medium for the persisted snapshot.

use crate::Result;

/// A single write in a storage batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl StorageOp {
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        StorageOp::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn remove(key: impl Into<String>) -> Self {
        StorageOp::Remove { key: key.into() }
    }
}

/// A client-scoped key-value store that survives restarts.
///
/// `apply` is all-or-nothing: after an error, none of the batch is visible.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Apply a batch of writes atomically.
    fn apply(&self, ops: &[StorageOp]) -> Result<()>;
}
