//! JSON-file-backed store
//!
//! The whole map lives in memory and is written back after every change:
//! temp file first, then rename, so a crash never leaves half a file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{KeyValueStore, Result};

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is an error; it is not silently discarded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                warn!(path = %path.display(), "storage file is empty, starting fresh");
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), keys = values.len(), "opened storage");
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `values` to disk and adopt them only once the rename landed
    fn commit(&mut self, values: BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(&values)?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)?;
        if let Err(e) = std::fs::rename(&temp_path, &self.path) {
            if let Err(cleanup) = std::fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %cleanup, "could not remove temp file");
            }
            return Err(e.into());
        }

        self.values = values;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn load_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save_string(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value.to_string());
        self.commit(values)?;
        debug!(key, "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.contains_key(key) {
            let mut values = self.values.clone();
            values.remove(key);
            self.commit(values)?;
            debug!(key, "removed value");
        }
        Ok(())
    }
}
