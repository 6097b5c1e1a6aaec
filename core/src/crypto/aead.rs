// ## 📂 File: `src/crypto/aead.rs`

//! src/crypto/aead.rs
//! Primitive cipher adapter over AES-GCM (128/192/256).
//!
//! Design notes:
//! - All variants use a 12-byte nonce and a 16-byte detached tag.
//! - The cipher object holds only expanded key material; it is immutable, so a
//!   shared reference can seal and open from any thread.
//! - Tag verification must fail closed. `aes-gcm` decrypts in place before the
//!   tag comparison result is known, so the buffer is wiped and dropped on
//!   failure; callers never see partial plaintext.
//! - No logging of key, nonce or plaintext material here.

use aes_gcm::aead::consts::{U12, U16};
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce, Tag};
use zeroize::Zeroize;

use crate::constants::{NONCE_LEN_12, TAG_LEN};
use crate::crypto::key::Key;
use crate::crypto::types::{CryptoError, KeySize};

type Aes192Gcm = AesGcm<Aes192, U12>;

/// AES-GCM instance for one key-size variant.
#[derive(Clone)]
pub enum AeadImpl {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// Ciphertext plus detached tag, as produced by `seal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

impl AeadImpl {
    /// Build the cipher for `key`, honouring its declared size.
    pub fn new(key: &Key) -> Result<Self, CryptoError> {
        Self::from_raw(key.size(), key.as_bytes())
    }

    /// Build the cipher from raw bytes; the length must match `size`.
    pub fn from_raw(size: KeySize, key: &[u8]) -> Result<Self, CryptoError> {
        let invalid = || CryptoError::InvalidKeyLength {
            expected: Some(size.key_len()),
            actual: key.len(),
        };
        if key.len() != size.key_len() {
            return Err(invalid());
        }

        match size {
            KeySize::Aes128 => Aes128Gcm::new_from_slice(key)
                .map(Self::Aes128)
                .map_err(|_| invalid()),
            KeySize::Aes192 => Aes192Gcm::new_from_slice(key)
                .map(Self::Aes192)
                .map_err(|_| invalid()),
            KeySize::Aes256 => Aes256Gcm::new_from_slice(key)
                .map(Self::Aes256)
                .map_err(|_| invalid()),
        }
    }

    pub fn key_size(&self) -> KeySize {
        match self {
            AeadImpl::Aes128(_) => KeySize::Aes128,
            AeadImpl::Aes192(_) => KeySize::Aes192,
            AeadImpl::Aes256(_) => KeySize::Aes256,
        }
    }

    /// AEAD seal: returns ciphertext (same length as plaintext) and tag.
    pub fn seal(&self, nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Sealed, CryptoError> {
        check_nonce(nonce)?;
        let nonce = Nonce::<U12>::from_slice(nonce);

        let mut buffer = plaintext.to_vec();
        let tag = match self {
            AeadImpl::Aes128(c) => c.encrypt_in_place_detached(nonce, aad, &mut buffer),
            AeadImpl::Aes192(c) => c.encrypt_in_place_detached(nonce, aad, &mut buffer),
            AeadImpl::Aes256(c) => c.encrypt_in_place_detached(nonce, aad, &mut buffer),
        };

        match tag {
            Ok(tag) => {
                let mut out = [0u8; TAG_LEN];
                out.copy_from_slice(tag.as_slice());
                Ok(Sealed { ciphertext: buffer, tag: out })
            }
            Err(_) => {
                buffer.zeroize();
                Err(CryptoError::SealFailure)
            }
        }
    }

    /// AEAD open: returns plaintext, or `AuthenticationFailure` with no bytes.
    pub fn open(
        &self,
        nonce: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce)?;
        if tag.len() != TAG_LEN {
            return Err(CryptoError::InvalidTagLength {
                expected: TAG_LEN,
                actual: tag.len(),
            });
        }
        let nonce = Nonce::<U12>::from_slice(nonce);
        let tag = Tag::<U16>::from_slice(tag);

        let mut buffer = ciphertext.to_vec();
        let verified = match self {
            AeadImpl::Aes128(c) => c.decrypt_in_place_detached(nonce, aad, &mut buffer, tag),
            AeadImpl::Aes192(c) => c.decrypt_in_place_detached(nonce, aad, &mut buffer, tag),
            AeadImpl::Aes256(c) => c.decrypt_in_place_detached(nonce, aad, &mut buffer, tag),
        };

        match verified {
            Ok(()) => Ok(buffer),
            Err(_) => {
                buffer.zeroize();
                Err(CryptoError::AuthenticationFailure)
            }
        }
    }
}

#[inline]
fn check_nonce(nonce: &[u8]) -> Result<(), CryptoError> {
    if nonce.len() != NONCE_LEN_12 {
        return Err(CryptoError::InvalidNonceLength {
            expected: NONCE_LEN_12,
            actual: nonce.len(),
        });
    }
    Ok(())
}

/// Stateless seal over raw key bytes. Key size is inferred from length.
pub fn seal(key: &[u8], nonce: &[u8], plaintext: &[u8], aad: &[u8]) -> Result<Sealed, CryptoError> {
    let size = KeySize::from_key_len(key.len())?;
    AeadImpl::from_raw(size, key)?.seal(nonce, plaintext, aad)
}

/// Stateless open over raw key bytes. Key size is inferred from length.
pub fn open(
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let size = KeySize::from_key_len(key.len())?;
    AeadImpl::from_raw(size, key)?.open(nonce, ciphertext, tag, aad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_each_key_size() {
        for size in [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256] {
            let key = vec![7u8; size.key_len()];
            let nonce = [1u8; NONCE_LEN_12];
            let sealed = seal(&key, &nonce, b"payload", b"hdr").unwrap();
            assert_eq!(sealed.ciphertext.len(), 7);
            let pt = open(&key, &nonce, &sealed.ciphertext, &sealed.tag, b"hdr").unwrap();
            assert_eq!(pt, b"payload");
        }
    }

    #[test]
    fn rejects_bad_nonce_length() {
        let key = [0u8; 32];
        assert_eq!(
            seal(&key, &[0u8; 8], b"x", b"").unwrap_err(),
            CryptoError::InvalidNonceLength { expected: 12, actual: 8 }
        );
    }

    #[test]
    fn rejects_bad_key_length() {
        assert!(matches!(
            seal(&[0u8; 31], &[0u8; 12], b"x", b""),
            Err(CryptoError::InvalidKeyLength { .. })
        ));
        assert!(matches!(
            AeadImpl::from_raw(KeySize::Aes128, &[0u8; 32]),
            Err(CryptoError::InvalidKeyLength { expected: Some(16), actual: 32 })
        ));
    }

    #[test]
    fn wrong_aad_is_auth_failure() {
        let key = [3u8; 16];
        let nonce = [0u8; 12];
        let sealed = seal(&key, &nonce, b"abc", b"one").unwrap();
        assert_eq!(
            open(&key, &nonce, &sealed.ciphertext, &sealed.tag, b"two").unwrap_err(),
            CryptoError::AuthenticationFailure
        );
    }

    #[test]
    fn short_tag_rejected_before_open() {
        let key = [3u8; 16];
        assert!(matches!(
            open(&key, &[0u8; 12], b"abc", &[0u8; 15], b""),
            Err(CryptoError::InvalidTagLength { expected: 16, actual: 15 })
        ));
    }
}
