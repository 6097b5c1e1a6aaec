// ## 📂 File: `src/recovery/persist.rs`

//! Counter store implementations.
//!
//! - `MemoryCounterStore`: shared map, outlives any one session. Useful for
//!   tests and for processes that re-key on every start.
//! - `FileCounterStore`: one small text file per store key. Writes go to a
//!   temp file, are `sync_all`'d, then atomically renamed over the old file.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::constants::CHECKPOINT_MAGIC;
use crate::recovery::checkpoint::{check_monotonic, CounterStore, PersistError, StoreKey};

/// In-memory store. Clones share the same backing map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    values: Arc<Mutex<HashMap<StoreKey, u128>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle bound to one store key.
    pub fn store(&self, key: StoreKey) -> MemoryCounterStore {
        MemoryCounterStore {
            key,
            backend: self.clone(),
        }
    }

    pub fn get(&self, key: &StoreKey) -> Option<u128> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.get(key).copied()
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCounterStore {
    key: StoreKey,
    backend: MemoryBackend,
}

impl CounterStore for MemoryCounterStore {
    fn store_key(&self) -> &StoreKey {
        &self.key
    }

    fn load(&self) -> Result<Option<u128>, PersistError> {
        Ok(self.backend.get(&self.key))
    }

    fn persist(&mut self, value: u128) -> Result<(), PersistError> {
        let mut values = self
            .backend
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        check_monotonic(&self.key, values.get(&self.key).copied(), value)?;
        values.insert(self.key.clone(), value);
        Ok(())
    }
}

/// File-backed store: `<dir>/<hex(device)>.<hex(key)>.ctr`.
///
/// File body: `CTR1 <hex(device)> <hex(key)> <value as 24 hex digits>\n`.
#[derive(Debug)]
pub struct FileCounterStore {
    key: StoreKey,
    path: PathBuf,
}

impl FileCounterStore {
    /// Bind to `dir`, creating it if needed.
    pub fn open(dir: impl AsRef<Path>, key: StoreKey) -> Result<Self, PersistError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let file_name = format!(
            "{}.{}.ctr",
            hex::encode(key.device_id.as_bytes()),
            hex::encode(key.key_id.as_bytes())
        );
        Ok(Self {
            path: dir.join(file_name),
            key,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("ctr.tmp")
    }

    // Makes the rename durable. Platforms that cannot open a directory
    // skip this step; a failed sync where it is supported is reported.
    fn sync_parent(&self) {
        let Some(dir) = self.path.parent() else {
            return;
        };
        let Ok(handle) = File::open(dir) else {
            return;
        };
        if let Err(e) = handle.sync_all() {
            warn!(
                key = %self.key,
                dir = %dir.display(),
                error = %e,
                "directory sync failed; counter rename may not be durable"
            );
        }
    }

    fn format_line(&self, value: u128) -> String {
        format!(
            "{} {} {} {:024x}\n",
            CHECKPOINT_MAGIC,
            hex::encode(self.key.device_id.as_bytes()),
            hex::encode(self.key.key_id.as_bytes()),
            value
        )
    }

    fn parse_line(&self, line: &str) -> Result<u128, PersistError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 4 || parts[0] != CHECKPOINT_MAGIC {
            return Err(PersistError::Corrupt(format!(
                "unrecognized checkpoint in {}",
                self.path.display()
            )));
        }
        if parts[1] != hex::encode(self.key.device_id.as_bytes())
            || parts[2] != hex::encode(self.key.key_id.as_bytes())
        {
            return Err(PersistError::Corrupt(format!(
                "checkpoint in {} belongs to another store key",
                self.path.display()
            )));
        }
        u128::from_str_radix(parts[3], 16)
            .map_err(|e| PersistError::Corrupt(format!("bad counter value: {e}")))
    }
}

impl CounterStore for FileCounterStore {
    fn store_key(&self) -> &StoreKey {
        &self.key
    }

    fn load(&self) -> Result<Option<u128>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(body) => self.parse_line(body.trim_end()).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&mut self, value: u128) -> Result<(), PersistError> {
        check_monotonic(&self.key, self.load()?, value)?;

        let tmp = self.tmp_path();
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)?;
            file.write_all(self.format_line(value).as_bytes())?;
            // Bytes must be on disk before the rename makes them visible.
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        self.sync_parent();

        debug!(key = %self.key, value = %value, "counter persisted");
        Ok(())
    }
}
