//! JSON file storage for the persisted snapshot.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use authgate_core::Result;
use authgate_core::error::StorageError;
use authgate_core::traits::{SessionStorage, StorageOp};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredEntries {
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// [`SessionStorage`] backed by a single JSON file.
///
/// Every batch is applied under an exclusive lock on a sibling `.lock` file,
/// written to a temporary file, and renamed over the target, so readers see
/// either the old or the new document. On Unix the file is created with mode
/// `0600`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at `path`. The file and its parent directories are created on
    /// first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the storage file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the file was last written, if ever.
    pub fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read_entries()?.updated_at)
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn read_entries(&self) -> Result<StoredEntries> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredEntries::default());
            }
            Err(e) => return Err(StorageError::from(e).into()),
        };

        if content.trim().is_empty() {
            return Ok(StoredEntries::default());
        }

        Ok(serde_json::from_str(&content).map_err(StorageError::from)?)
    }

    fn write_entries(&self, stored: &StoredEntries) -> Result<()> {
        let content = serde_json::to_string_pretty(stored).map_err(StorageError::from)?;

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("session");
        let temp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        let result = (|| -> std::io::Result<()> {
            let mut file = OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp_path)?;

            #[cfg(unix)]
            {
                file.set_permissions(fs::Permissions::from_mode(0o600))?;
            }

            file.write_all(content.as_bytes())?;
            file.sync_data()?;
            fs::rename(&temp_path, &self.path)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }

        result.map_err(|e| StorageError::from(e).into())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.entries.remove(key))
    }

    #[instrument(skip(self, ops), fields(path = %self.path.display(), ops = ops.len()))]
    fn apply(&self, ops: &[StorageOp]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StorageError::from)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())
            .map_err(StorageError::from)?;

        lock_file.lock_exclusive().map_err(StorageError::from)?;

        // A corrupt document is replaced rather than blocking every write.
        let mut stored = self.read_entries().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Replacing unreadable session file");
            StoredEntries::default()
        });

        for op in ops {
            match op {
                StorageOp::Set { key, value } => {
                    stored.entries.insert(key.clone(), value.clone());
                }
                StorageOp::Remove { key } => {
                    stored.entries.remove(key);
                }
            }
        }
        stored.updated_at = Some(Utc::now());

        let result = self.write_entries(&stored);
        let _ = FileExt::unlock(&lock_file);
        result?;

        debug!(keys = stored.entries.len(), "Session file written");
        Ok(())
    }
}
