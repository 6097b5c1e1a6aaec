// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Counters collected by a session across encrypt/decrypt calls.
//!
//! Summary: `SessionCounters` is updated with relaxed atomics because decrypt
//! runs without the session lock. `TelemetryCounters` is the plain value read
//! out of it and merged across sessions.

use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Plain counter values.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub records_sealed: u64,
    pub records_opened: u64,
    pub auth_failures: u64,
    pub encrypt_failures: u64,
    /// Plaintext bytes going into successful seals.
    pub bytes_sealed_plaintext: u64,
    /// Plaintext bytes recovered by successful opens.
    pub bytes_opened_plaintext: u64,
    pub bytes_ciphertext: u64,
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Total nonce + tag bytes added on the wire.
    pub fn framing_overhead_bytes(&self) -> u64 {
        self.bytes_overhead
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.records_sealed += other.records_sealed;
        self.records_opened += other.records_opened;
        self.auth_failures += other.auth_failures;
        self.encrypt_failures += other.encrypt_failures;
        self.bytes_sealed_plaintext += other.bytes_sealed_plaintext;
        self.bytes_opened_plaintext += other.bytes_opened_plaintext;
        self.bytes_ciphertext += other.bytes_ciphertext;
        self.bytes_overhead += other.bytes_overhead;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

/// Live counters owned by one session.
#[derive(Default, Debug)]
pub struct SessionCounters {
    records_sealed: AtomicU64,
    records_opened: AtomicU64,
    auth_failures: AtomicU64,
    encrypt_failures: AtomicU64,
    bytes_sealed_plaintext: AtomicU64,
    bytes_opened_plaintext: AtomicU64,
    bytes_ciphertext: AtomicU64,
    bytes_overhead: AtomicU64,
}

impl SessionCounters {
    /// Record one sealed record.
    ///
    /// - `pt_len`: plaintext length
    /// - `overhead_len`: nonce + tag bytes
    pub fn add_seal(&self, pt_len: usize, overhead_len: usize) {
        self.records_sealed.fetch_add(1, Ordering::Relaxed);
        self.bytes_sealed_plaintext.fetch_add(pt_len as u64, Ordering::Relaxed);
        self.bytes_ciphertext.fetch_add(pt_len as u64, Ordering::Relaxed);
        self.bytes_overhead.fetch_add(overhead_len as u64, Ordering::Relaxed);
    }

    /// Record one successfully opened record.
    pub fn add_open(&self, pt_len: usize) {
        self.records_opened.fetch_add(1, Ordering::Relaxed);
        self.bytes_opened_plaintext.fetch_add(pt_len as u64, Ordering::Relaxed);
    }

    pub fn add_auth_failure(&self) {
        self.auth_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_encrypt_failure(&self) {
        self.encrypt_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn read(&self) -> TelemetryCounters {
        TelemetryCounters {
            records_sealed: self.records_sealed.load(Ordering::Relaxed),
            records_opened: self.records_opened.load(Ordering::Relaxed),
            auth_failures: self.auth_failures.load(Ordering::Relaxed),
            encrypt_failures: self.encrypt_failures.load(Ordering::Relaxed),
            bytes_sealed_plaintext: self.bytes_sealed_plaintext.load(Ordering::Relaxed),
            bytes_opened_plaintext: self.bytes_opened_plaintext.load(Ordering::Relaxed),
            bytes_ciphertext: self.bytes_ciphertext.load(Ordering::Relaxed),
            bytes_overhead: self.bytes_overhead.load(Ordering::Relaxed),
        }
    }
}
