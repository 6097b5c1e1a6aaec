// ## 📂 File: `src/crypto/key.rs`

//! Key material handling.
//!
//! Design:
//! - A `Key` is tied to one `KeySize` and is immutable once built.
//! - Bytes live in a `Zeroizing` buffer and are wiped on drop.
//! - `Debug` never prints key bytes.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::crypto::types::{CryptoError, KeySize};

/// Opaque AES key of a declared size.
#[derive(Clone)]
pub struct Key {
    size: KeySize,
    bytes: Zeroizing<Vec<u8>>,
}

impl Key {
    /// Import key bytes, requiring them to match `size` exactly.
    pub fn from_slice(size: KeySize, bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != size.key_len() {
            return Err(CryptoError::InvalidKeyLength {
                expected: Some(size.key_len()),
                actual: bytes.len(),
            });
        }
        Ok(Self {
            size,
            bytes: Zeroizing::new(bytes.to_vec()),
        })
    }

    /// Import key bytes, inferring the variant from their length.
    pub fn infer(bytes: &[u8]) -> Result<Self, CryptoError> {
        let size = KeySize::from_key_len(bytes.len())?;
        Self::from_slice(size, bytes)
    }

    pub fn size(&self) -> KeySize {
        self.size
    }

    /// Raw key bytes. Only the cipher adapter should need these.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("size", &self.size)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// Generate a fresh key from the OS CSPRNG.
pub fn generate_key(size: KeySize) -> Result<Key, CryptoError> {
    let mut bytes = Zeroizing::new(vec![0u8; size.key_len()]);
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))?;
    Ok(Key { size, bytes })
}
