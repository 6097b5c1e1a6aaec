// ## 📂 File: `src/crypto/types.rs`

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{KEY_LEN_16, KEY_LEN_24, KEY_LEN_32};

/// AES key-size variant. Selected once per session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySize {
    Aes128,
    Aes192,
    #[default]
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    #[inline]
    pub const fn key_len(self) -> usize {
        match self {
            KeySize::Aes128 => KEY_LEN_16,
            KeySize::Aes192 => KEY_LEN_24,
            KeySize::Aes256 => KEY_LEN_32,
        }
    }

    /// Key length in bits.
    #[inline]
    pub const fn bits(self) -> usize {
        self.key_len() * 8
    }

    /// Map a raw key length back to its variant.
    pub fn from_key_len(len: usize) -> Result<Self, CryptoError> {
        match len {
            KEY_LEN_16 => Ok(KeySize::Aes128),
            KEY_LEN_24 => Ok(KeySize::Aes192),
            KEY_LEN_32 => Ok(KeySize::Aes256),
            actual => Err(CryptoError::InvalidKeyLength { expected: None, actual }),
        }
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}-GCM", self.bits())
    }
}

/// Errors from the primitive cipher adapter and key handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key length does not match a declared variant (or the requested one).
    #[error("invalid key length: expected={}, actual={actual}", expected_str(.expected))]
    InvalidKeyLength { expected: Option<usize>, actual: usize },

    /// Nonce length mismatch (must be 12 bytes for AES-GCM).
    #[error("invalid nonce length: expected={expected}, actual={actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    /// Tag length mismatch (must be 16 bytes).
    #[error("invalid tag length: expected={expected}, actual={actual}")]
    InvalidTagLength { expected: usize, actual: usize },

    /// Tag verification failed. Reject the record; never retry.
    #[error("authentication failure")]
    AuthenticationFailure,

    /// The primitive refused to seal (e.g. plaintext above the GCM limit).
    #[error("AES-GCM seal failed")]
    SealFailure,

    /// OS CSPRNG could not produce key material.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

fn expected_str(expected: &Option<usize>) -> String {
    match expected {
        Some(n) => n.to_string(),
        None => format!("{KEY_LEN_16}|{KEY_LEN_24}|{KEY_LEN_32}"),
    }
}

/// Errors from the nonce sequencer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NonceError {
    /// Counter reached its maximum. Terminal: the key must be rotated.
    #[error("nonce space exhausted; rotate the key")]
    NonceSpaceExhausted,

    /// CSPRNG could not produce nonce bytes. No fallback source exists.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Counter width must be a multiple of 8 in `8..=96`.
    #[error("invalid counter width: {bits} bits")]
    InvalidCounterWidth { bits: u32 },

    /// Prefix length does not fill the bytes left over by the counter.
    #[error("invalid nonce prefix: expected {expected} bytes, got {actual}")]
    InvalidPrefix { expected: usize, actual: usize },

    /// Restored counter value does not fit the configured width.
    #[error("counter value {value} exceeds {bits}-bit width")]
    CounterOutOfRange { value: u128, bits: u32 },
}
