//! Key-value persistence the record store writes through

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A string-keyed blob store
pub trait KeyValueStorage: Send + Sync {
  /// `Ok(None)` when nothing is stored under `key`
  fn get(&self, key: &str) -> io::Result<Option<String>>;

  /// Replace whatever is stored under `key`
  fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
  root: PathBuf,
}

impl FileStorage {
  pub fn new<P: AsRef<Path>>(root: P) -> Self {
    Self { root: root.as_ref().to_path_buf() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn path_for(&self, key: &str) -> PathBuf {
    self.root.join(format!("{key}.json"))
  }
}

impl KeyValueStorage for FileStorage {
  fn get(&self, key: &str) -> io::Result<Option<String>> {
    match fs::read_to_string(self.path_for(key)) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  fn set(&self, key: &str, value: &str) -> io::Result<()> {
    fs::create_dir_all(&self.root)?;

    // Write beside the target then rename, so readers never see half a blob
    let path = self.path_for(key);
    let staging = self.root.join(format!(".{key}.json.tmp"));
    fs::write(&staging, value)?;
    fs::rename(&staging, &path)
  }
}

/// In-memory storage; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
  entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
    self.entries.lock().map_err(|_| io::Error::other("memory storage lock poisoned"))
  }
}

impl KeyValueStorage for MemoryStorage {
  fn get(&self, key: &str) -> io::Result<Option<String>> {
    Ok(self.lock()?.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> io::Result<()> {
    self.lock()?.insert(key.to_string(), value.to_string());
    Ok(())
  }
}
