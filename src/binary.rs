//! Byte container shared by every layer.
//!
//! `Binary` is immutable once built. Callers that persist it (manifests,
//! transport) do their own base64/hex conversion.

use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Raw bytes that can also be read back as UTF-8 text.
#[derive(Clone, Default, PartialEq, Eq, Zeroize)]
pub struct Binary {
    bytes: Vec<u8>,
}

impl Binary {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Text is stored as its UTF-8 encoding.
    pub fn from_string(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Borrow the contents as text. Fails if the bytes are not UTF-8.
    pub fn as_str(&self) -> Result<&str> {
        core::str::from_utf8(&self.bytes).map_err(|_| Error::crypto("binary is not valid UTF-8"))
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Contents may be key material; show only the length.
impl core::fmt::Debug for Binary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Binary").field("len", &self.bytes.len()).finish()
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&str> for Binary {
    fn from(text: &str) -> Self {
        Self::from_string(text)
    }
}
