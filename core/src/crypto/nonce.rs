// ## 📂 File: `src/crypto/nonce.rs`

//! Nonce sequencer: owns the IV space for one (key, device) pairing.
//!
//! Design:
//! - Two strategies, fixed at construction: CSPRNG-drawn random nonces, or a
//!   monotonically advancing counter serialized big-endian into the low bytes
//!   of the 12-byte nonce. The remaining high bytes hold a fixed per-device
//!   prefix (empty for the default 96-bit counter).
//! - Counter `value` is the last value handed out. `next()` increments first,
//!   so a fresh sequencer at 0 yields `00..01` and 0 is never used as a nonce.
//! - Reaching the width maximum is terminal: `exhausted` latches and every
//!   later call fails with `NonceSpaceExhausted`. There is no wrap and no
//!   prefix re-roll.
//!
//! Persistence contract (counter only):
//! - After each `next()` whose nonce will be acted on, the caller persists
//!   `snapshot()` before the resulting ciphertext is considered committed.
//! - On restart the last persisted value, never an earlier one, is passed to
//!   `Counter::restore`. The next nonce is then strictly greater than any nonce
//!   used before the restart.
//!
//! Security notes:
//! - Never mix strategies for the same key.
//! - Random nonces are only acceptable while the number of encryptions under
//!   one key stays far below 2^32.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_COUNTER_BITS, NONCE_LEN_12};
use crate::crypto::types::NonceError;

/// Nonce strategy selected at session construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceStrategy {
    Random,
    #[default]
    Counter,
}

/// Any cryptographically secure RNG usable as a nonce source.
pub trait CsRng: RngCore + CryptoRng + Send {}

impl<T: RngCore + CryptoRng + Send> CsRng for T {}

/// Counter state: `prefix ‖ value` (big-endian), `value` last handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    prefix: Vec<u8>,
    value: u128,
    width_bits: u32,
    exhausted: bool,
}

impl Counter {
    /// Full-width 96-bit counter starting at 0.
    pub fn new() -> Self {
        Self {
            prefix: Vec::new(),
            value: 0,
            width_bits: MAX_COUNTER_BITS,
            exhausted: false,
        }
    }

    /// Counter of `width_bits` with a caller-supplied prefix filling the rest.
    pub fn with_prefix(width_bits: u32, prefix: &[u8]) -> Result<Self, NonceError> {
        validate_width(width_bits)?;
        let expected = prefix_len(width_bits);
        if prefix.len() != expected {
            return Err(NonceError::InvalidPrefix {
                expected,
                actual: prefix.len(),
            });
        }
        Ok(Self {
            prefix: prefix.to_vec(),
            value: 0,
            width_bits,
            exhausted: false,
        })
    }

    /// Counter of `width_bits` with a prefix drawn once from the OS CSPRNG.
    pub fn random_prefix(width_bits: u32) -> Result<Self, NonceError> {
        validate_width(width_bits)?;
        let mut prefix = vec![0u8; prefix_len(width_bits)];
        OsRng
            .try_fill_bytes(&mut prefix)
            .map_err(|e| NonceError::EntropyUnavailable(e.to_string()))?;
        Self::with_prefix(width_bits, &prefix)
    }

    /// Resume from the last persisted value.
    ///
    /// A restored value at the maximum yields an already-exhausted counter.
    pub fn restore(mut self, value: u128) -> Result<Self, NonceError> {
        let max = self.max_value();
        if value > max {
            return Err(NonceError::CounterOutOfRange {
                value,
                bits: self.width_bits,
            });
        }
        self.value = value;
        self.exhausted = value == max;
        Ok(self)
    }

    /// Largest value the counter can emit.
    pub fn max_value(&self) -> u128 {
        max_for_width(self.width_bits)
    }

    pub fn width_bits(&self) -> u32 {
        self.width_bits
    }

    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Last value handed out (0 if none yet).
    pub fn snapshot(&self) -> u128 {
        self.value
    }

    fn next(&mut self) -> Result<[u8; NONCE_LEN_12], NonceError> {
        if self.exhausted || self.value >= self.max_value() {
            self.exhausted = true;
            return Err(NonceError::NonceSpaceExhausted);
        }
        self.value += 1;
        if self.value == self.max_value() {
            // This nonce is still valid; the next call is not.
            self.exhausted = true;
        }
        self.encode(self.value)
    }

    /// Serialize `prefix ‖ value` into nonce bytes. `value` must fit the
    /// counter width.
    pub fn encode(&self, value: u128) -> Result<[u8; NONCE_LEN_12], NonceError> {
        if value > self.max_value() {
            return Err(NonceError::CounterOutOfRange {
                value,
                bits: self.width_bits,
            });
        }
        let mut nonce = [0u8; NONCE_LEN_12];
        let split = self.prefix.len();
        nonce[..split].copy_from_slice(&self.prefix);
        BigEndian::write_uint128(&mut nonce[split..], value, NONCE_LEN_12 - split);
        Ok(nonce)
    }

    /// Recover the counter value from nonce bytes produced by this layout.
    pub fn decode(&self, nonce: &[u8; NONCE_LEN_12]) -> u128 {
        let split = self.prefix.len();
        BigEndian::read_uint128(&nonce[split..], NONCE_LEN_12 - split)
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the nonce space for one key. Not `Clone`: cloning would fork the
/// counter and reuse nonces.
pub enum NonceSequencer {
    Random(Box<dyn CsRng>),
    Counter(Counter),
}

impl NonceSequencer {
    /// Random nonces from the OS CSPRNG.
    pub fn random() -> Self {
        NonceSequencer::Random(Box::new(OsRng))
    }

    /// Random nonces from a caller-supplied CSPRNG.
    pub fn random_with(rng: Box<dyn CsRng>) -> Self {
        NonceSequencer::Random(rng)
    }

    /// Counter nonces continuing after `counter.snapshot()`.
    pub fn counter(counter: Counter) -> Self {
        NonceSequencer::Counter(counter)
    }

    pub fn strategy(&self) -> NonceStrategy {
        match self {
            NonceSequencer::Random(_) => NonceStrategy::Random,
            NonceSequencer::Counter(_) => NonceStrategy::Counter,
        }
    }

    /// Produce the next nonce. A returned nonce is spent whether or not the
    /// caller goes on to use it.
    pub fn next(&mut self) -> Result<[u8; NONCE_LEN_12], NonceError> {
        match self {
            NonceSequencer::Random(rng) => {
                let mut nonce = [0u8; NONCE_LEN_12];
                rng.try_fill_bytes(&mut nonce)
                    .map_err(|e| NonceError::EntropyUnavailable(e.to_string()))?;
                Ok(nonce)
            }
            NonceSequencer::Counter(counter) => counter.next(),
        }
    }

    /// Counter value to persist; `None` for random nonces.
    pub fn snapshot(&self) -> Option<u128> {
        match self {
            NonceSequencer::Random(_) => None,
            NonceSequencer::Counter(counter) => Some(counter.snapshot()),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        match self {
            NonceSequencer::Random(_) => false,
            NonceSequencer::Counter(counter) => counter.is_exhausted(),
        }
    }

    pub fn as_counter(&self) -> Option<&Counter> {
        match self {
            NonceSequencer::Random(_) => None,
            NonceSequencer::Counter(counter) => Some(counter),
        }
    }
}

impl fmt::Debug for NonceSequencer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonceSequencer::Random(_) => f.write_str("NonceSequencer::Random"),
            NonceSequencer::Counter(c) => f
                .debug_struct("NonceSequencer::Counter")
                .field("value", &c.value)
                .field("width_bits", &c.width_bits)
                .field("exhausted", &c.exhausted)
                .finish(),
        }
    }
}

/// Validate a counter width: multiple of 8 in `8..=96`.
#[inline]
pub fn validate_width(bits: u32) -> Result<(), NonceError> {
    if bits == 0 || bits > MAX_COUNTER_BITS || bits % 8 != 0 {
        return Err(NonceError::InvalidCounterWidth { bits });
    }
    Ok(())
}

#[inline]
fn prefix_len(width_bits: u32) -> usize {
    NONCE_LEN_12 - (width_bits / 8) as usize
}

#[inline]
fn max_for_width(width_bits: u32) -> u128 {
    (1u128 << width_bits) - 1
}
