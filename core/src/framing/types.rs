// ## 📂 File: `src/framing/types.rs`

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MIN_FIXED_RECORD_LEN, MIN_PREFIXED_RECORD_LEN, NONCE_LEN_12, TAG_LEN};

/// One sealed message: `nonce ‖ ciphertext ‖ tag`.
///
/// Carries no reference to the session that produced it; any session holding
/// the same key can open it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthenticatedRecord {
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

impl AuthenticatedRecord {
    pub fn new(nonce: impl Into<Vec<u8>>, ciphertext: impl Into<Vec<u8>>, tag: impl Into<Vec<u8>>) -> Self {
        Self {
            nonce: nonce.into(),
            ciphertext: ciphertext.into(),
            tag: tag.into(),
        }
    }

    /// Plaintext length (ciphertext is the same length under GCM).
    pub fn plaintext_len(&self) -> usize {
        self.ciphertext.len()
    }

    /// Bytes added on top of the plaintext by the given layout.
    pub fn overhead(&self, layout: WireLayout) -> usize {
        layout.encoded_len(self) - self.ciphertext.len()
    }
}

/// Binary wire layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireLayout {
    /// `nonce(12) ‖ ciphertext ‖ tag(16)`. Lengths agreed out-of-band.
    #[default]
    Fixed,
    /// `nonce_len(1) ‖ nonce ‖ tag_len(1) ‖ ciphertext ‖ tag`.
    LengthPrefixed,
}

impl WireLayout {
    /// Shortest input `unpack` can accept.
    pub const fn min_len(self) -> usize {
        match self {
            WireLayout::Fixed => MIN_FIXED_RECORD_LEN,
            WireLayout::LengthPrefixed => MIN_PREFIXED_RECORD_LEN,
        }
    }

    /// Exact packed size of `record`.
    pub fn encoded_len(self, record: &AuthenticatedRecord) -> usize {
        let body = record.nonce.len() + record.ciphertext.len() + record.tag.len();
        match self {
            WireLayout::Fixed => body,
            WireLayout::LengthPrefixed => body + 2,
        }
    }
}

/// Printable transform applied on top of the binary layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Lowercase hex, two characters per byte.
    #[default]
    Hex,
    /// Standard base64 with padding.
    Base64,
}

/// Combined binary + text codec settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codec {
    pub layout: WireLayout,
    pub text: TextEncoding,
}

/// Fixed-layout field lengths.
pub const FIXED_NONCE_LEN: usize = NONCE_LEN_12;
pub const FIXED_TAG_LEN: usize = TAG_LEN;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Input too short, or declared lengths do not fit the remaining bytes.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// Text could not be turned back into bytes.
    #[error("encoding error: {0}")]
    EncodingError(String),
}
