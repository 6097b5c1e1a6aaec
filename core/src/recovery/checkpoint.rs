// ## 📂 File: `src/recovery/checkpoint.rs`

//! Counter checkpoints and the persistence hook contract.
//!
//! The session calls `CounterStore::persist` synchronously inside its encrypt
//! critical section, after advancing the counter and before sealing. A failed
//! persist fails that encrypt call; the advanced value is treated as spent.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one counter: (device identity, key identity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
    pub device_id: String,
    pub key_id: String,
}

impl StoreKey {
    pub fn new(device_id: impl Into<String>, key_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            key_id: key_id.into(),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.key_id)
    }
}

/// Last counter value handed out for one store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterCheckpoint {
    pub key: StoreKey,
    pub value: u128,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("counter store I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored data could not be parsed or belongs to another store key.
    #[error("corrupt counter checkpoint: {0}")]
    Corrupt(String),

    /// Refused to move the stored counter backwards.
    #[error("counter rollback refused for {key}: stored={stored}, attempted={attempted}")]
    Rollback {
        key: StoreKey,
        stored: u128,
        attempted: u128,
    },
}

/// Durable home for one counter. Implementations must make `persist`
/// durable before returning `Ok`.
pub trait CounterStore: Send {
    fn store_key(&self) -> &StoreKey;

    /// Last persisted value, or `None` if this key was never used.
    fn load(&self) -> Result<Option<u128>, PersistError>;

    /// Durably record `value`. Must refuse values below the stored one.
    fn persist(&mut self, value: u128) -> Result<(), PersistError>;

    fn checkpoint(&self) -> Result<Option<CounterCheckpoint>, PersistError> {
        Ok(self.load()?.map(|value| CounterCheckpoint {
            key: self.store_key().clone(),
            value,
        }))
    }

    fn summary(&self) -> String {
        format!("CounterStore: key={}", self.store_key())
    }
}

/// Shared rollback guard for store implementations.
pub(crate) fn check_monotonic(
    key: &StoreKey,
    stored: Option<u128>,
    attempted: u128,
) -> Result<(), PersistError> {
    match stored {
        Some(stored) if attempted < stored => Err(PersistError::Rollback {
            key: key.clone(),
            stored,
            attempted,
        }),
        _ => Ok(()),
    }
}
