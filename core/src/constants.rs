// ## 📂 File: `src/constants.rs`

//! Wire and primitive constants shared by every layer.

/// AES-128 key length (bytes).
pub const KEY_LEN_16: usize = 16;
/// AES-192 key length (bytes).
pub const KEY_LEN_24: usize = 24;
/// AES-256 key length (bytes).
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Widest counter a 12-byte nonce can hold.
pub const MAX_COUNTER_BITS: u32 = (NONCE_LEN_12 * 8) as u32;

/// Counter width used by the constrained preset: `prefix(8) ‖ counter(4)`.
pub const IOT_COUNTER_BITS: u32 = 32;

/// Smallest possible fixed-layout record: nonce + tag, empty ciphertext.
pub const MIN_FIXED_RECORD_LEN: usize = NONCE_LEN_12 + TAG_LEN;

/// Smallest possible length-prefixed record:
/// `nonce_len(1) ‖ nonce(>=1) ‖ tag_len(1) ‖ tag(>=1)`.
pub const MIN_PREFIXED_RECORD_LEN: usize = 1 + 1 + 1 + 1;

/// Default env prefix for `SessionConfig::from_env`.
pub const DEFAULT_ENV_PREFIX: &str = "AEAD_SESSION";

/// Counter checkpoint file format marker.
pub const CHECKPOINT_MAGIC: &str = "CTR1";
