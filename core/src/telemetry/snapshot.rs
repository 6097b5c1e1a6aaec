// ## src/telemetry/snapshot.rs

//! Immutable telemetry snapshot for one session.

use serde::{Deserialize, Serialize};

use crate::crypto::{KeySize, NonceStrategy};
use crate::telemetry::counters::TelemetryCounters;

/// Point-in-time view of a session. Never contains key or nonce bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub key_size: KeySize,
    pub strategy: NonceStrategy,
    /// Last counter value handed out; `None` for random nonces.
    pub counter: Option<u128>,
    pub exhausted: bool,
    pub counters: TelemetryCounters,
    /// Wire bytes per plaintext byte; 0.0 before any seal.
    pub expansion_ratio: f64,
}

impl TelemetrySnapshot {
    pub fn from(
        key_size: KeySize,
        strategy: NonceStrategy,
        counter: Option<u128>,
        exhausted: bool,
        counters: TelemetryCounters,
    ) -> Self {
        let sealed_pt = counters.bytes_ciphertext;
        let expansion_ratio = if sealed_pt > 0 {
            (sealed_pt + counters.bytes_overhead) as f64 / sealed_pt as f64
        } else {
            0.0
        };
        Self {
            key_size,
            strategy,
            counter,
            exhausted,
            counters,
            expansion_ratio,
        }
    }

    pub fn output_bytes(&self) -> u64 {
        self.counters.bytes_ciphertext + self.counters.bytes_overhead
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
