//! aead-session
//!
//! Authenticated-encryption session manager over AES-GCM.
//! Owns nonce state and wire framing; the block cipher and GCM maths come
//! from `aes-gcm`, randomness from the OS CSPRNG.
//!
//! ```text
//! caller ─► Session::encrypt ─► NonceSequencer::next ─► [CounterStore::persist]
//!                                                    ─► AeadImpl::seal ─► AuthenticatedRecord
//! caller ─► framing::unpack ─► Session::decrypt ─► AeadImpl::open ─► plaintext | AuthenticationFailure
//! ```

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod config;

pub mod crypto;
pub mod framing;
pub mod recovery;
pub mod telemetry;

pub mod session;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::crypto::{generate_key, Counter, Key, KeySize, NonceSequencer, NonceStrategy};
    pub use crate::framing::{
        pack, pack_text, unpack, unpack_text, AuthenticatedRecord, Codec, TextEncoding, WireLayout,
    };
    pub use crate::recovery::{CounterStore, FileCounterStore, MemoryBackend, StoreKey};
    pub use crate::session::Session;
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::SessionError;
}
