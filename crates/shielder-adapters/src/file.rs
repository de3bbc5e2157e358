//! Single JSON document on disk holding every storage key.
//!
//! Writes go to a sibling temp file that is then renamed over the document,
//! so readers in this or another process see the old or the new document,
//! never a partial one.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shielder_core::{PortError, StoragePort};

#[derive(Debug)]
pub struct FileStorageAdapter {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorageAdapter {
    /// Opens (without creating) the document at `path`; missing parent
    /// directories are created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PortError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                PortError::Transport(format!("create {} failed: {e}", parent.display()))
            })?;
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, PortError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "storage read failed");
                return Err(PortError::Transport(format!(
                    "read {} failed: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&raw).map_err(|e| {
            PortError::Validation(format!("{} is not a storage document: {e}", self.path.display()))
        })
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), PortError> {
        let raw = serde_json::to_vec_pretty(document)
            .map_err(|e| PortError::Validation(format!("storage serialize failed: {e}")))?;
        let tmp = self.path.with_extension("tmp");
        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&raw)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "storage write failed");
            PortError::Transport(format!("write {} failed: {e}", self.path.display()))
        })
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>) -> bool,
    ) -> Result<(), PortError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| PortError::Transport(format!("file storage lock poisoned: {e}")))?;
        let mut document = self.read_document()?;
        if apply(&mut document) {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

impl StoragePort for FileStorageAdapter {
    fn get_string(&self, key: &str) -> Result<Option<String>, PortError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PortError> {
        self.update(|document| {
            document.insert(key.to_owned(), value.to_owned());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), PortError> {
        self.update(|document| document.remove(key).is_some())
    }
}
