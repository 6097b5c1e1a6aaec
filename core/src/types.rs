// ## 📂 File: `src/types.rs`

use thiserror::Error;

use crate::crypto::{CryptoError, NonceError};
use crate::framing::FrameError;
use crate::recovery::PersistError;

/// Unified session error.
///
/// Variants follow the caller-facing taxonomy:
/// - construction: `InvalidKeyLength`, `Config`
/// - environment: `EntropyUnavailable`
/// - terminal for the key: `NonceSpaceExhausted`
/// - reject this record: `AuthenticationFailure`, `MalformedRecord`, `EncodingError`
/// - fatal for this encrypt call: `Persistence`
///
/// Nothing in this crate retries after any of these.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid key length: expected={expected:?}, actual={actual}")]
    InvalidKeyLength { expected: Option<usize>, actual: usize },

    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("nonce space exhausted; session must be retired and the key rotated")]
    NonceSpaceExhausted,

    #[error("authentication failure")]
    AuthenticationFailure,

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    /// Counter advancement could not be made durable; no record was produced.
    #[error("counter persistence failed: {0}")]
    Persistence(#[from] PersistError),

    /// Remaining primitive errors (nonce/tag length, seal refusal).
    #[error("crypto error: {0}")]
    Crypto(CryptoError),

    /// Remaining sequencer errors (width, prefix, restore range).
    #[error("nonce error: {0}")]
    Nonce(NonceError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<CryptoError> for SessionError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidKeyLength { expected, actual } => {
                SessionError::InvalidKeyLength { expected, actual }
            }
            CryptoError::AuthenticationFailure => SessionError::AuthenticationFailure,
            CryptoError::EntropyUnavailable(msg) => SessionError::EntropyUnavailable(msg),
            other => SessionError::Crypto(other),
        }
    }
}

impl From<NonceError> for SessionError {
    fn from(e: NonceError) -> Self {
        match e {
            NonceError::NonceSpaceExhausted => SessionError::NonceSpaceExhausted,
            NonceError::EntropyUnavailable(msg) => SessionError::EntropyUnavailable(msg),
            other => SessionError::Nonce(other),
        }
    }
}

impl From<FrameError> for SessionError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::MalformedRecord(msg) => SessionError::MalformedRecord(msg),
            FrameError::EncodingError(msg) => SessionError::EncodingError(msg),
        }
    }
}

impl From<config::ConfigError> for SessionError {
    fn from(e: config::ConfigError) -> Self {
        SessionError::Config(e.to_string())
    }
}
