//! Cipher Engine: AES-256-GCM with the positional wire frame.
//!
//! `encrypt` returns `iv || ciphertext || tag`; `decrypt` takes the same frame
//! back. Raw cryptography is delegated to the injected [`CryptoService`].

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::algorithm::SymmetricAlgorithm;
use crate::binary::Binary;
use crate::config::CryptoConfig;
use crate::error::{Error, Result};
use crate::service::{CryptoService, DecryptResult, EncryptResult};
use crate::wire::{self, IV_BYTES, KEY_BYTES};

pub trait SymmetricCipher {
    fn name(&self) -> &'static str;

    fn algorithm(&self) -> SymmetricAlgorithm;

    fn generate_initialization_vector(&self) -> Result<Vec<u8>>;

    fn generate_key(&self) -> Result<Zeroizing<Vec<u8>>>;

    /// Encrypt and frame. `payload` of the result is the full wire frame.
    fn encrypt(&self, payload: &Binary, key: &Binary, iv: &Binary) -> Result<EncryptResult>;

    /// Parse and decrypt a wire frame.
    ///
    /// `iv` is a legacy argument: the IV embedded in the frame is used.
    fn decrypt(&self, frame: &[u8], key: &Binary, iv: Option<&Binary>) -> Result<DecryptResult>;
}

#[derive(Debug, Clone)]
pub struct AesGcmCipher<S> {
    service: S,
    iv_length: usize,
    key_length: usize,
}

impl<S: CryptoService> AesGcmCipher<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            iv_length: IV_BYTES,
            key_length: KEY_BYTES,
        }
    }

    pub fn with_config(service: S, config: &CryptoConfig) -> Self {
        Self {
            service,
            iv_length: config.iv_length,
            key_length: config.key_length,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn iv_length(&self) -> usize {
        self.iv_length
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }
}

impl<S: CryptoService> SymmetricCipher for AesGcmCipher<S> {
    fn name(&self) -> &'static str {
        "AES-256-GCM"
    }

    fn algorithm(&self) -> SymmetricAlgorithm {
        SymmetricAlgorithm::Aes256Gcm
    }

    fn generate_initialization_vector(&self) -> Result<Vec<u8>> {
        if self.iv_length == 0 {
            return Err(Error::Configuration("No iv length".into()));
        }
        self.service.random_bytes(self.iv_length)
    }

    fn generate_key(&self) -> Result<Zeroizing<Vec<u8>>> {
        if self.key_length == 0 {
            return Err(Error::Configuration("No key length".into()));
        }
        self.service.random_bytes(self.key_length).map(Zeroizing::new)
    }

    fn encrypt(&self, payload: &Binary, key: &Binary, iv: &Binary) -> Result<EncryptResult> {
        let result = self.service.encrypt(payload, key, iv, self.algorithm())?;
        let tag = result
            .auth_tag
            .ok_or_else(|| Error::crypto("provider returned no tag for AES-256-GCM"))?;

        let frame = wire::encode_frame(iv.as_bytes(), result.payload.as_bytes(), tag.as_bytes())?;
        Ok(EncryptResult {
            payload: Binary::from_bytes(frame),
            auth_tag: Some(tag),
        })
    }

    fn decrypt(&self, frame: &[u8], key: &Binary, iv: Option<&Binary>) -> Result<DecryptResult> {
        let parts = wire::decode_frame(frame)?;

        if let Some(iv) = iv {
            if !bool::from(iv.as_bytes().ct_eq(parts.iv)) {
                tracing::warn!(
                    given_len = iv.len(),
                    "decrypt iv argument differs from frame iv; using frame iv"
                );
            }
        }

        self.service.decrypt(
            &Binary::from_bytes(parts.ciphertext),
            key,
            &Binary::from_bytes(&parts.iv[..]),
            self.algorithm(),
            Some(&Binary::from_bytes(&parts.tag[..])),
        )
    }
}
