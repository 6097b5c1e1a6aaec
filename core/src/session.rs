// ## 📂 File: `src/session.rs`

//! Session: one key, one nonce sequencer, one cipher.
//!
//! Encrypt critical section (per session, under one mutex):
//!
//! ```text
//! advance nonce ──► persist counter (if a store is bound) ──► seal
//! ```
//!
//! - A nonce returned by the sequencer is spent even if persist or seal then
//!   fails. The next call moves past it; nothing retries.
//! - A persist failure fails the call without producing a record.
//! - Decrypt touches no mutable state and never takes the lock.
//! - Key size and nonce strategy are fixed at construction. Changing either
//!   means building a new session.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::config::SessionConfig;
use crate::constants::MAX_COUNTER_BITS;
use crate::crypto::{
    generate_key, AeadImpl, Counter, CryptoError, Key, KeySize, NonceSequencer, NonceStrategy,
};
use crate::framing::{pack, pack_text, unpack, unpack_text, AuthenticatedRecord};
use crate::recovery::CounterStore;
use crate::telemetry::{SessionCounters, TelemetrySnapshot};
use crate::types::SessionError;

struct EncryptState {
    sequencer: NonceSequencer,
    store: Option<Box<dyn CounterStore>>,
}

/// Authenticated-encryption session. `Sync`: share it behind an `Arc`.
pub struct Session {
    cipher: AeadImpl,
    config: SessionConfig,
    state: Mutex<EncryptState>,
    counters: SessionCounters,
}

impl Session {
    /// Session over `key` with a sequencer built from `config`.
    ///
    /// Counter widths below 96 bits get a prefix drawn once from the OS
    /// CSPRNG.
    pub fn new(key: Key, config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let sequencer = sequencer_for(&config)?;
        Self::from_parts(key, config, sequencer, None)
    }

    /// Fresh random key plus a session over it. The key is returned so the
    /// caller can hand it to whoever decrypts.
    pub fn generate(config: SessionConfig) -> Result<(Self, Key), SessionError> {
        let key = generate_key(config.key_size)?;
        let session = Self::new(key.clone(), config)?;
        Ok((session, key))
    }

    /// Counter session bound to a durable store.
    ///
    /// The last persisted value is loaded before the first encryption; the
    /// first nonce produced is strictly greater than it.
    pub fn with_store(
        key: Key,
        config: SessionConfig,
        store: Box<dyn CounterStore>,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let sequencer = sequencer_for(&config)?;
        Self::from_parts(key, config, sequencer, Some(store))
    }

    /// Assemble a session from an explicit sequencer (e.g. a counter with a
    /// device-specific prefix). If `store` is given and holds a checkpoint,
    /// the counter is restored from it.
    pub fn from_parts(
        key: Key,
        config: SessionConfig,
        sequencer: NonceSequencer,
        store: Option<Box<dyn CounterStore>>,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        if key.size() != config.key_size {
            return Err(SessionError::InvalidKeyLength {
                expected: Some(config.key_size.key_len()),
                actual: key.as_bytes().len(),
            });
        }
        if sequencer.strategy() != config.nonce_strategy {
            return Err(SessionError::Config(format!(
                "sequencer strategy {:?} does not match configured {:?}",
                sequencer.strategy(),
                config.nonce_strategy
            )));
        }
        if let Some(counter) = sequencer.as_counter() {
            if counter.width_bits() != config.counter_bits {
                return Err(SessionError::Config(format!(
                    "counter width {} does not match configured {}",
                    counter.width_bits(),
                    config.counter_bits
                )));
            }
        }

        let sequencer = match (sequencer, store.as_ref()) {
            (NonceSequencer::Random(_), Some(_)) => {
                return Err(SessionError::Config(
                    "counter store requires the counter nonce strategy".into(),
                ));
            }
            (NonceSequencer::Counter(counter), Some(store)) => match store.load()? {
                // Resume from whichever position is further along; never rewind.
                Some(value) if value > counter.snapshot() => {
                    info!(key = %store.store_key(), value = %value, "counter restored");
                    NonceSequencer::counter(counter.restore(value)?)
                }
                Some(value) if value < counter.snapshot() => {
                    warn!(
                        key = %store.store_key(),
                        stored = %value,
                        supplied = %counter.snapshot(),
                        "supplied counter ahead of store; keeping supplied position"
                    );
                    NonceSequencer::counter(counter)
                }
                Some(_) => NonceSequencer::counter(counter),
                None => {
                    debug!(key = %store.store_key(), "no checkpoint; counter starts fresh");
                    NonceSequencer::counter(counter)
                }
            },
            (sequencer, None) => sequencer,
        };

        let cipher = AeadImpl::new(&key)?;

        info!(
            key_size = %config.key_size,
            strategy = ?config.nonce_strategy,
            counter_bits = config.counter_bits,
            layout = ?config.layout,
            persistent = store.is_some(),
            "session constructed"
        );

        Ok(Self {
            cipher,
            config,
            state: Mutex::new(EncryptState { sequencer, store }),
            counters: SessionCounters::default(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn key_size(&self) -> KeySize {
        self.config.key_size
    }

    pub fn strategy(&self) -> NonceStrategy {
        self.config.nonce_strategy
    }

    // A panic inside the critical section can only leave the counter ahead
    // of the store, never behind, so a poisoned lock is still safe to use.
    fn lock_state(&self) -> MutexGuard<'_, EncryptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last counter value handed out; `None` for random nonces.
    pub fn counter(&self) -> Option<u128> {
        self.lock_state().sequencer.snapshot()
    }

    /// True once the counter space is spent. The session must be retired.
    pub fn is_exhausted(&self) -> bool {
        self.lock_state().sequencer.is_exhausted()
    }

    /// Seal `plaintext` under the next nonce.
    pub fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> Result<AuthenticatedRecord, SessionError> {
        let result = self.encrypt_locked(plaintext, aad);
        if result.is_err() {
            self.counters.add_encrypt_failure();
        }
        result
    }

    fn encrypt_locked(&self, plaintext: &[u8], aad: &[u8]) -> Result<AuthenticatedRecord, SessionError> {
        let mut state = self.lock_state();

        let nonce = state.sequencer.next().map_err(|e| {
            warn!(error = %e, "nonce sequencer refused; session must be retired");
            SessionError::from(e)
        })?;

        let EncryptState { sequencer, store } = &mut *state;
        if let (Some(value), Some(store)) = (sequencer.snapshot(), store.as_mut()) {
            store.persist(value).map_err(|e| {
                error!(key = %store.store_key(), value = %value, error = %e, "counter persist failed; nonce discarded");
                SessionError::from(e)
            })?;
        }

        let sealed = self.cipher.seal(&nonce, plaintext, aad)?;
        drop(state);

        let record = AuthenticatedRecord::new(nonce.to_vec(), sealed.ciphertext, sealed.tag.to_vec());
        self.counters
            .add_seal(plaintext.len(), record.nonce.len() + record.tag.len());
        Ok(record)
    }

    /// Open a record. Never retries, never tries another key.
    pub fn decrypt(&self, record: &AuthenticatedRecord, aad: &[u8]) -> Result<Vec<u8>, SessionError> {
        self.decrypt_parts(&record.nonce, &record.ciphertext, &record.tag, aad)
    }

    /// Open detached components. Nonce or tag lengths the cipher cannot take
    /// are `MalformedRecord`.
    pub fn decrypt_parts(
        &self,
        nonce: &[u8],
        ciphertext: &[u8],
        tag: &[u8],
        aad: &[u8],
    ) -> Result<Vec<u8>, SessionError> {
        match self.cipher.open(nonce, ciphertext, tag, aad) {
            Ok(plaintext) => {
                self.counters.add_open(plaintext.len());
                Ok(plaintext)
            }
            Err(CryptoError::AuthenticationFailure) => {
                self.counters.add_auth_failure();
                debug!(ct_len = ciphertext.len(), "record rejected: authentication failure");
                Err(SessionError::AuthenticationFailure)
            }
            Err(CryptoError::InvalidNonceLength { expected, actual })
            | Err(CryptoError::InvalidTagLength { expected, actual }) => {
                Err(SessionError::MalformedRecord(format!(
                    "record field length {actual}, expected {expected}"
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Encrypt and pack with the configured wire layout.
    pub fn encrypt_combined(&self, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>, SessionError> {
        let record = self.encrypt(plaintext, aad)?;
        Ok(pack(&record, self.config.layout)?)
    }

    /// Unpack with the configured wire layout, then decrypt.
    pub fn decrypt_combined(&self, wire: &[u8], aad: &[u8]) -> Result<Vec<u8>, SessionError> {
        let record = unpack(wire, self.config.layout)?;
        self.decrypt(&record, aad)
    }

    /// Encrypt and pack to the configured text encoding.
    pub fn encrypt_text(&self, plaintext: &[u8], aad: &[u8]) -> Result<String, SessionError> {
        let record = self.encrypt(plaintext, aad)?;
        Ok(pack_text(&record, self.config.codec())?)
    }

    /// Decode text, unpack, decrypt.
    pub fn decrypt_text(&self, text: &str, aad: &[u8]) -> Result<Vec<u8>, SessionError> {
        let record = unpack_text(text, self.config.codec())?;
        self.decrypt(&record, aad)
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        let (counter, exhausted) = {
            let state = self.lock_state();
            (state.sequencer.snapshot(), state.sequencer.is_exhausted())
        };
        TelemetrySnapshot::from(
            self.config.key_size,
            self.config.nonce_strategy,
            counter,
            exhausted,
            self.counters.read(),
        )
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn sequencer_for(config: &SessionConfig) -> Result<NonceSequencer, SessionError> {
    Ok(match config.nonce_strategy {
        NonceStrategy::Random => NonceSequencer::random(),
        NonceStrategy::Counter if config.counter_bits == MAX_COUNTER_BITS => {
            NonceSequencer::counter(Counter::new())
        }
        NonceStrategy::Counter => NonceSequencer::counter(Counter::random_prefix(config.counter_bits)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_size_must_match_config() {
        let key = Key::from_slice(KeySize::Aes128, &[0u8; 16]).unwrap();
        let err = Session::new(key, SessionConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidKeyLength { expected: Some(32), actual: 16 }
        ));
    }

    #[test]
    fn strategy_mismatch_rejected() {
        let key = Key::from_slice(KeySize::Aes256, &[0u8; 32]).unwrap();
        let err = Session::from_parts(
            key,
            SessionConfig::default(),
            NonceSequencer::random(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn debug_hides_key() {
        let (session, _key) = Session::generate(SessionConfig::default()).unwrap();
        let dbg = format!("{:?}", session);
        assert!(dbg.contains("Session"));
        assert!(!dbg.contains("cipher"));
    }
}
