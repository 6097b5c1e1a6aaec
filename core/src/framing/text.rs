// ## 📂 File: `src/framing/text.rs`

//! Text-safe codec: binary layout composed with a reversible byte↔text map.
//!
//! Malformed text (odd length, non-hex digits, bad base64) fails with
//! `EncodingError` before any byte is handed to the binary decoder.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::framing::decode::unpack;
use crate::framing::encode::pack;
use crate::framing::types::{AuthenticatedRecord, Codec, FrameError, TextEncoding};

/// Bytes → printable text.
pub fn encode_text(bytes: &[u8], encoding: TextEncoding) -> String {
    match encoding {
        TextEncoding::Hex => hex::encode(bytes),
        TextEncoding::Base64 => STANDARD.encode(bytes),
    }
}

/// Printable text → bytes.
pub fn decode_text(text: &str, encoding: TextEncoding) -> Result<Vec<u8>, FrameError> {
    match encoding {
        TextEncoding::Hex => {
            if text.bytes().any(|b| b.is_ascii_uppercase()) {
                return Err(FrameError::EncodingError("hex must be lowercase".into()));
            }
            hex::decode(text).map_err(|e| FrameError::EncodingError(e.to_string()))
        }
        TextEncoding::Base64 => STANDARD
            .decode(text)
            .map_err(|e| FrameError::EncodingError(e.to_string())),
    }
}

/// `encode_text(pack(record))`.
pub fn pack_text(record: &AuthenticatedRecord, codec: Codec) -> Result<String, FrameError> {
    let wire = pack(record, codec.layout)?;
    Ok(encode_text(&wire, codec.text))
}

/// `unpack(decode_text(text))`.
pub fn unpack_text(text: &str, codec: Codec) -> Result<AuthenticatedRecord, FrameError> {
    let wire = decode_text(text, codec.text)?;
    unpack(&wire, codec.layout)
}
