// ## 📂 File: `src/framing/encode.rs`

use crate::framing::types::{AuthenticatedRecord, FrameError, WireLayout};
use crate::framing::types::{FIXED_NONCE_LEN, FIXED_TAG_LEN};

/// Encode a record into its canonical wire bytes.
///
/// Layouts:
///
/// ```text
/// Fixed:          [ nonce (12) ][ ciphertext (M) ][ tag (16) ]
/// LengthPrefixed: [ nonce_len (1) ][ nonce (N) ][ tag_len (1) ][ ciphertext (M) ][ tag (T) ]
/// ```
///
/// Records whose fields cannot be represented (wrong fixed lengths, empty or
/// >255-byte prefixed fields) are refused rather than packed lossily.
pub fn pack(record: &AuthenticatedRecord, layout: WireLayout) -> Result<Vec<u8>, FrameError> {
    let expected = layout.encoded_len(record);
    let mut out = Vec::with_capacity(expected);

    match layout {
        WireLayout::Fixed => {
            if record.nonce.len() != FIXED_NONCE_LEN || record.tag.len() != FIXED_TAG_LEN {
                return Err(FrameError::MalformedRecord(format!(
                    "fixed layout needs nonce={} tag={}, got nonce={} tag={}",
                    FIXED_NONCE_LEN,
                    FIXED_TAG_LEN,
                    record.nonce.len(),
                    record.tag.len()
                )));
            }
            out.extend_from_slice(&record.nonce);
            out.extend_from_slice(&record.ciphertext);
            out.extend_from_slice(&record.tag);
        }
        WireLayout::LengthPrefixed => {
            let nonce_len = field_len("nonce", record.nonce.len())?;
            let tag_len = field_len("tag", record.tag.len())?;
            out.push(nonce_len);
            out.extend_from_slice(&record.nonce);
            out.push(tag_len);
            out.extend_from_slice(&record.ciphertext);
            out.extend_from_slice(&record.tag);
        }
    }

    debug_assert_eq!(out.len(), expected);
    Ok(out)
}

#[inline]
fn field_len(name: &str, len: usize) -> Result<u8, FrameError> {
    match u8::try_from(len) {
        Ok(0) | Err(_) => Err(FrameError::MalformedRecord(format!(
            "{name} length {len} outside 1..=255"
        ))),
        Ok(n) => Ok(n),
    }
}
