//! Local key-value slots that the expense list is persisted into.
//!
//! A `KeyValue` holds opaque bytes under string keys. `FileKeyValue` keeps one file per key inside
//! a directory; `MemoryKeyValue` keeps everything in memory and is what tests use.

use crate::{utils, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{trace, warn};

/// A minimal key-value store. Last write wins.
pub trait KeyValue {
    /// Returns the bytes stored under `key`, or `None` if nothing readable is stored there.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Replaces whatever is stored under `key` with `value`.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileKeyValue {
    dir: PathBuf,
}

impl FileKeyValue {
    /// Creates `dir` if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        utils::make_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds the value for `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValue for FileKeyValue {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path(key);
        match std::fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("No value stored at {}", path.display());
                None
            }
            Err(e) => {
                warn!("Unable to read {}, treating it as empty: {e}", path.display());
                None
            }
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        // Write beside the target and rename over it so readers never see a partial value.
        let path = self.path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        utils::write(&tmp, value)?;
        utils::rename(&tmp, &path)
    }
}

/// An in-memory `KeyValue`. Clones share the same storage, which lets a test drop a `Store` and
/// open a new one over the same data to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValue {
    map: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKeyValue {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.map.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Serves whatever the wrapped `MemoryKeyValue` holds and refuses every write.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ReadOnlyKeyValue(pub MemoryKeyValue);

#[cfg(test)]
impl KeyValue for ReadOnlyKeyValue {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.0.get(key)
    }

    fn set(&self, key: &str, _value: &[u8]) -> Result<()> {
        anyhow::bail!("Unable to write '{key}': the store is read-only")
    }
}
