//! Envelope orchestration: one key, N wrapped shares, one framed payload.
//!
//! Seal:
//!   key    = random[32]
//!   frame  = AES-256-GCM(key, iv, payload)            (iv || ct || tag)
//!   shares = split(key, N)                            (one per recipient)
//!   wrap_i = RSA-OAEP(recipient_i.public_key, share_i)
//!   sig    = HMAC-SHA256(key, hex(tag))               (hex in, hex out)
//!
//! Open reverses it and refuses to decrypt if the signature does not match
//! the merged key.

use std::fmt;
use std::sync::Arc;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::algorithm::SymmetricAlgorithm;
use crate::binary::Binary;
use crate::cipher::{AesGcmCipher, SymmetricCipher};
use crate::config::CryptoConfig;
use crate::error::{Error, Result};
use crate::keysplit::{self, Share};
use crate::provider::RustCryptoService;
use crate::service::CryptoService;
use crate::wire::{IV_BYTES, KEY_BYTES};

/// A key-access authority that receives one share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub id: String,
    pub public_key_pem: String,
}

impl Recipient {
    pub fn new(id: impl Into<String>, public_key_pem: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            public_key_pem: public_key_pem.into(),
        }
    }
}

/// One share wrapped under one recipient's public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedShare {
    pub recipient_id: String,
    pub wrapped_key: Binary,
}

/// Everything a collaborator needs to persist for later decryption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedEnvelope {
    pub algorithm: SymmetricAlgorithm,
    /// `iv || ciphertext || tag`
    pub frame: Binary,
    pub auth_tag: Binary,
    /// In recipient order; all entries are needed to open.
    pub key_access: Vec<WrappedShare>,
    /// Hex HMAC-SHA256 of the hex tag under the payload key.
    pub root_signature: String,
}

pub struct Envelope<S> {
    service: Arc<S>,
    cipher: AesGcmCipher<Arc<S>>,
}

impl Default for Envelope<RustCryptoService> {
    fn default() -> Self {
        Self::new(RustCryptoService::new())
    }
}

impl<S> Clone for Envelope<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            cipher: self.cipher.clone(),
        }
    }
}

impl<S: CryptoService> fmt::Debug for Envelope<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("iv_length", &self.cipher.iv_length())
            .field("key_length", &self.cipher.key_length())
            .finish_non_exhaustive()
    }
}

impl<S: CryptoService> Envelope<S> {
    pub fn new(service: S) -> Self {
        let service = Arc::new(service);
        Self {
            cipher: AesGcmCipher::new(Arc::clone(&service)),
            service,
        }
    }

    /// Build from a validated config.
    ///
    /// The cipher accepts any non-zero IV and key length, but an envelope
    /// frames with a 12-byte IV under an AES-256 key, so anything else is
    /// rejected here rather than on the first `seal`.
    pub fn with_config(service: S, config: &CryptoConfig) -> Result<Self> {
        config.validate()?;
        if config.iv_length != IV_BYTES {
            return Err(Error::Configuration(format!(
                "envelope iv_length must be {}, got {}",
                IV_BYTES, config.iv_length
            )));
        }
        if config.key_length != KEY_BYTES {
            return Err(Error::Configuration(format!(
                "envelope key_length must be {}, got {}",
                KEY_BYTES, config.key_length
            )));
        }

        let service = Arc::new(service);
        Ok(Self {
            cipher: AesGcmCipher::with_config(Arc::clone(&service), config),
            service,
        })
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn cipher(&self) -> &AesGcmCipher<Arc<S>> {
        &self.cipher
    }

    /// Encrypt `payload` under a fresh key and hand one wrapped share to each
    /// recipient.
    pub fn seal(&self, payload: &Binary, recipients: &[Recipient]) -> Result<SealedEnvelope> {
        if recipients.is_empty() {
            return Err(Error::ShareCount("seal requires at least one recipient"));
        }

        let key = self.cipher.generate_key()?;
        let key_bin = Zeroizing::new(Binary::from_bytes(key.to_vec()));
        let iv = Binary::from_bytes(self.cipher.generate_initialization_vector()?);

        let encrypted = self.cipher.encrypt(payload, &key_bin, &iv)?;
        let auth_tag = encrypted
            .auth_tag
            .ok_or_else(|| Error::crypto("cipher returned no tag"))?;

        let shares = keysplit::split_with(&*self.service, &key, recipients.len())?;
        let key_access = recipients
            .iter()
            .zip(shares.iter())
            .map(|(recipient, share)| {
                let share_bin = Zeroizing::new(Binary::from_bytes(share.to_vec()));
                let wrapped_key = self
                    .service
                    .encrypt_with_public_key(&share_bin, &recipient.public_key_pem)?;
                Ok(WrappedShare {
                    recipient_id: recipient.id.clone(),
                    wrapped_key,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let root_signature = self.signature(&key, &auth_tag)?;

        tracing::debug!(
            recipients = recipients.len(),
            payload_len = payload.len(),
            frame_len = encrypted.payload.len(),
            "sealed envelope"
        );

        Ok(SealedEnvelope {
            algorithm: self.cipher.algorithm(),
            frame: encrypted.payload,
            auth_tag,
            key_access,
            root_signature,
        })
    }

    /// Unwrap every share with the matching private key (same order as
    /// `key_access`).
    pub fn unwrap_shares(&self, envelope: &SealedEnvelope, private_keys_pem: &[&str]) -> Result<Vec<Share>> {
        if private_keys_pem.len() != envelope.key_access.len() {
            return Err(Error::ShareCount("one private key is required per wrapped share"));
        }

        envelope
            .key_access
            .iter()
            .zip(private_keys_pem)
            .map(|(access, pem)| {
                let share = self.service.decrypt_with_private_key(&access.wrapped_key, pem)?;
                Ok(Zeroizing::new(share.into_vec()))
            })
            .collect()
    }

    pub fn open(&self, envelope: &SealedEnvelope, private_keys_pem: &[&str]) -> Result<Binary> {
        let shares = self.unwrap_shares(envelope, private_keys_pem)?;
        self.open_with_shares(envelope, &shares)
    }

    /// Open with shares that were unwrapped elsewhere (e.g. by the
    /// key-access authorities themselves).
    pub fn open_with_shares<T: AsRef<[u8]>>(&self, envelope: &SealedEnvelope, shares: &[T]) -> Result<Binary> {
        if envelope.algorithm != self.cipher.algorithm() {
            return Err(Error::crypto(format!(
                "envelope algorithm {} is not supported by {}",
                envelope.algorithm,
                self.cipher.name()
            )));
        }
        if shares.len() != envelope.key_access.len() {
            return Err(Error::ShareCount("share count does not match key access entries"));
        }

        let key = keysplit::merge(shares)?;

        let expected = self.signature(&key, &envelope.auth_tag)?;
        if !bool::from(expected.as_bytes().ct_eq(envelope.root_signature.as_bytes())) {
            tracing::debug!("envelope root signature mismatch");
            return Err(Error::Authentication);
        }

        let key_bin = Zeroizing::new(Binary::from_bytes(key.to_vec()));
        let decrypted = self.cipher.decrypt(envelope.frame.as_bytes(), &key_bin, None)?;

        tracing::debug!(
            shares = shares.len(),
            payload_len = decrypted.payload.len(),
            "opened envelope"
        );
        Ok(decrypted.payload)
    }

    fn signature(&self, key: &[u8], auth_tag: &Binary) -> Result<String> {
        let key_hex = Zeroizing::new(hex::encode(key));
        self.service.hmac(&key_hex, &hex::encode(auth_tag.as_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Blocking-pool wrappers
// ---------------------------------------------------------------------------

#[cfg(feature = "async")]
impl<S: CryptoService + 'static> Envelope<S> {
    /// [`CryptoService::generate_key_pair`] on tokio's blocking pool.
    pub async fn generate_key_pair_async(&self, size_bits: Option<usize>) -> Result<crate::keypair::KeyPair> {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || service.generate_key_pair(size_bits))
            .await
            .map_err(|e| Error::crypto(format!("key generation task failed: {}", e)))?
    }

    /// [`Envelope::seal`] on tokio's blocking pool.
    pub async fn seal_async(&self, payload: Binary, recipients: Vec<Recipient>) -> Result<SealedEnvelope> {
        let envelope = self.clone();
        tokio::task::spawn_blocking(move || envelope.seal(&payload, &recipients))
            .await
            .map_err(|e| Error::crypto(format!("seal task failed: {}", e)))?
    }
}
