//! Wire frame
//!
//! Format:
//!   iv[12] || ciphertext[*] || tag[16]
//!
//! Positional, no length prefix: both sides know the IV and tag sizes.

use crate::error::{Error, Result};

pub const IV_BYTES: usize = 12;
pub const TAG_BYTES: usize = 16;

/// AES-256 key size.
pub const KEY_BYTES: usize = 32;

/// Smallest valid frame: IV + tag around an empty ciphertext.
pub const MIN_FRAME_BYTES: usize = IV_BYTES + TAG_BYTES; // 28

/// Borrowed view of a parsed frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameComponents<'a> {
    pub iv: &'a [u8; IV_BYTES],
    pub ciphertext: &'a [u8],
    pub tag: &'a [u8; TAG_BYTES],
}

pub fn decode_frame(data: &[u8]) -> Result<FrameComponents<'_>> {
    if data.len() < MIN_FRAME_BYTES {
        return Err(Error::crypto(format!(
            "frame too short: {} bytes, need at least {}",
            data.len(),
            MIN_FRAME_BYTES
        )));
    }

    let tag_start = data.len() - TAG_BYTES;

    let iv: &[u8; IV_BYTES] = data[..IV_BYTES]
        .try_into()
        .map_err(|_| Error::crypto("frame iv"))?;
    let tag: &[u8; TAG_BYTES] = data[tag_start..]
        .try_into()
        .map_err(|_| Error::crypto("frame tag"))?;

    Ok(FrameComponents {
        iv,
        ciphertext: &data[IV_BYTES..tag_start],
        tag,
    })
}

pub fn encode_frame(iv: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
    if iv.len() != IV_BYTES {
        return Err(Error::crypto(format!(
            "frame iv must be {} bytes, got {}",
            IV_BYTES,
            iv.len()
        )));
    }
    if tag.len() != TAG_BYTES {
        return Err(Error::crypto(format!(
            "frame tag must be {} bytes, got {}",
            TAG_BYTES,
            tag.len()
        )));
    }

    let mut out = Vec::with_capacity(MIN_FRAME_BYTES + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(ciphertext);
    out.extend_from_slice(tag);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_positional() {
        let iv = [1u8; IV_BYTES];
        let tag = [3u8; TAG_BYTES];
        let frame = encode_frame(&iv, &[2u8; 5], &tag).unwrap();
        assert_eq!(frame.len(), MIN_FRAME_BYTES + 5);

        let parts = decode_frame(&frame).unwrap();
        assert_eq!(parts.iv, &iv);
        assert_eq!(parts.ciphertext, &[2u8; 5]);
        assert_eq!(parts.tag, &tag);
    }

    #[test]
    fn empty_ciphertext_is_minimum_frame() {
        let frame = encode_frame(&[0u8; IV_BYTES], &[], &[0u8; TAG_BYTES]).unwrap();
        assert_eq!(frame.len(), MIN_FRAME_BYTES);
        assert!(decode_frame(&frame).unwrap().ciphertext.is_empty());
    }

    #[test]
    fn short_frame_rejected() {
        assert!(matches!(decode_frame(&[0u8; MIN_FRAME_BYTES - 1]), Err(Error::Crypto(_))));
        assert!(decode_frame(&[]).is_err());
    }

    #[test]
    fn encode_rejects_wrong_iv_or_tag_length() {
        assert!(encode_frame(&[0u8; 16], b"x", &[0u8; TAG_BYTES]).is_err());
        assert!(encode_frame(&[0u8; IV_BYTES], b"x", &[0u8; 8]).is_err());
    }
}
