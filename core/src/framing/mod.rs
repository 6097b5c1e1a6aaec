//! Wire framing for sealed records.
//!
//! Responsibilities:
//! - Define the authenticated record and wire layouts
//! - Pack records into canonical bytes, and text for text-only channels
//! - Unpack with strict length validation
//!
//! Non-responsibilities:
//! - Cryptography
//! - Nonce management
//! - IO

pub mod types;
pub mod encode;
pub mod decode;
pub mod text;

pub use types::{
    AuthenticatedRecord,
    Codec,
    FrameError,
    TextEncoding,
    WireLayout,
};
pub use encode::pack;
pub use decode::unpack;
pub use text::{decode_text, encode_text, pack_text, unpack_text};
