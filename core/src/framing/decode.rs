// ## 📂 File: `src/framing/decode.rs`

use crate::framing::types::{AuthenticatedRecord, FrameError, WireLayout};
use crate::framing::types::{FIXED_NONCE_LEN, FIXED_TAG_LEN};

/// Decode wire bytes into a record.
///
/// Rejects, with `MalformedRecord`, anything shorter than the layout minimum
/// or whose declared lengths overrun the input. No byte is interpreted as
/// ciphertext until the whole layout has been validated.
pub fn unpack(wire: &[u8], layout: WireLayout) -> Result<AuthenticatedRecord, FrameError> {
    if wire.len() < layout.min_len() {
        return Err(FrameError::MalformedRecord(format!(
            "truncated: {} bytes, minimum {}",
            wire.len(),
            layout.min_len()
        )));
    }

    match layout {
        WireLayout::Fixed => {
            let ct_end = wire.len() - FIXED_TAG_LEN;
            Ok(AuthenticatedRecord {
                nonce: wire[..FIXED_NONCE_LEN].to_vec(),
                ciphertext: wire[FIXED_NONCE_LEN..ct_end].to_vec(),
                tag: wire[ct_end..].to_vec(),
            })
        }
        WireLayout::LengthPrefixed => unpack_prefixed(wire),
    }
}

fn unpack_prefixed(wire: &[u8]) -> Result<AuthenticatedRecord, FrameError> {
    let mut off = 0;

    let nonce_len = wire[off] as usize;
    off += 1;
    if nonce_len == 0 {
        return Err(FrameError::MalformedRecord("zero nonce length".into()));
    }
    // nonce + tag_len byte must fit
    if wire.len() < off + nonce_len + 1 {
        return Err(FrameError::MalformedRecord(format!(
            "declared nonce length {} overruns {} bytes",
            nonce_len,
            wire.len()
        )));
    }
    let nonce = &wire[off..off + nonce_len];
    off += nonce_len;

    let tag_len = wire[off] as usize;
    off += 1;
    if tag_len == 0 {
        return Err(FrameError::MalformedRecord("zero tag length".into()));
    }
    if wire.len() < off + tag_len {
        return Err(FrameError::MalformedRecord(format!(
            "declared tag length {} overruns {} remaining bytes",
            tag_len,
            wire.len() - off
        )));
    }

    let ct_end = wire.len() - tag_len;
    Ok(AuthenticatedRecord {
        nonce: nonce.to_vec(),
        ciphertext: wire[off..ct_end].to_vec(),
        tag: wire[ct_end..].to_vec(),
    })
}
