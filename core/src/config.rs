// ## 📂 File: `src/config.rs`

//! Session configuration.
//!
//! One parameterized session covers both the full-feature and the
//! constrained-device mode: key size and nonce strategy are knobs, not
//! separate implementations.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ENV_PREFIX, IOT_COUNTER_BITS, MAX_COUNTER_BITS};
use crate::crypto::{validate_width, KeySize, NonceStrategy};
use crate::framing::{Codec, TextEncoding, WireLayout};
use crate::types::SessionError;

/// Immutable per-session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub key_size: KeySize,
    pub nonce_strategy: NonceStrategy,
    /// Counter width in bits; the rest of the 96-bit nonce is a fixed prefix.
    pub counter_bits: u32,
    pub layout: WireLayout,
    pub text: TextEncoding,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key_size: KeySize::Aes256,
            nonce_strategy: NonceStrategy::Counter,
            counter_bits: MAX_COUNTER_BITS,
            layout: WireLayout::Fixed,
            text: TextEncoding::Hex,
        }
    }
}

impl SessionConfig {
    /// Constrained-device preset: AES-128, `prefix(8) ‖ counter(4)` nonces.
    pub fn iot() -> Self {
        Self {
            key_size: KeySize::Aes128,
            counter_bits: IOT_COUNTER_BITS,
            ..Self::default()
        }
    }

    /// Random-nonce preset for the given key size.
    pub fn random(key_size: KeySize) -> Self {
        Self {
            key_size,
            nonce_strategy: NonceStrategy::Random,
            ..Self::default()
        }
    }

    pub fn codec(&self) -> Codec {
        Codec {
            layout: self.layout,
            text: self.text,
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.nonce_strategy == NonceStrategy::Counter {
            validate_width(self.counter_bits)?;
        }
        Ok(())
    }

    /// Load from `<PREFIX>_KEY_SIZE`, `<PREFIX>_NONCE_STRATEGY`,
    /// `<PREFIX>_COUNTER_BITS`, `<PREFIX>_LAYOUT`, `<PREFIX>_TEXT`.
    /// Missing variables fall back to defaults.
    pub fn from_env(prefix: Option<&str>) -> Result<Self, SessionError> {
        let cfg = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(prefix.unwrap_or(DEFAULT_ENV_PREFIX))
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?;

        let c: SessionConfig = cfg.try_deserialize()?;
        c.validate()?;
        Ok(c)
    }
}
