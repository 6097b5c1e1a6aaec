//! telemetry/mod.rs
//! Session counters and immutable snapshots.
//!
//! Notes:
//! - Counters never include key, nonce or plaintext material.
//! - Snapshots are serde-serializable for export.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
