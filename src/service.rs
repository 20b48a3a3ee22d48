//! Crypto Service: the provider contract.
//!
//! Everything above this trait (cipher, splitter, envelope) is pure
//! composition. Substitute a different backend or a test double by
//! implementing [`CryptoService`] and passing it in at construction.

use std::sync::Arc;

use crate::algorithm::SymmetricAlgorithm;
use crate::binary::Binary;
use crate::error::{Error, Result};
use crate::keypair::{KeyPair, PemKeyPair, DEFAULT_KEY_SIZE_BITS, MIN_ASYMMETRIC_KEY_SIZE_BITS};

/// Output of a symmetric encrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptResult {
    /// Ciphertext at the provider level; the full wire frame at the cipher level.
    pub payload: Binary,
    /// Present for authenticated algorithms.
    pub auth_tag: Option<Binary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptResult {
    pub payload: Binary,
}

pub trait CryptoService: Send + Sync {
    /// Cryptographically secure random bytes.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>>;

    /// Raw symmetric encrypt. For GCM the tag is returned separately.
    fn encrypt(
        &self,
        payload: &Binary,
        key: &Binary,
        iv: &Binary,
        algorithm: SymmetricAlgorithm,
    ) -> Result<EncryptResult>;

    /// Raw symmetric decrypt. A GCM tag mismatch is [`Error::Authentication`].
    fn decrypt(
        &self,
        payload: &Binary,
        key: &Binary,
        iv: &Binary,
        algorithm: SymmetricAlgorithm,
        auth_tag: Option<&Binary>,
    ) -> Result<DecryptResult>;

    /// Lowercase hex SHA-256 of the UTF-8 content.
    fn sha256(&self, content: &str) -> String;

    /// Lowercase hex HMAC-SHA256 keyed by the hex-decoded `key_hex`.
    fn hmac(&self, key_hex: &str, content: &str) -> Result<String>;

    /// Whether the asymmetric backend can generate a modulus of `bits`.
    fn supports_key_size(&self, bits: usize) -> bool;

    fn default_key_size_bits(&self) -> usize {
        DEFAULT_KEY_SIZE_BITS
    }

    /// Generation hook. Called only with sizes that passed
    /// [`CryptoService::generate_key_pair`]'s pre-flight check.
    fn generate_key_pair_unchecked(&self, bits: usize) -> Result<KeyPair>;

    /// Generate an asymmetric key pair, `size_bits` defaulting to
    /// [`CryptoService::default_key_size_bits`].
    ///
    /// Sizes below [`MIN_ASYMMETRIC_KEY_SIZE_BITS`] or outside the provider's
    /// supported set fail with [`Error::InvalidKeySize`] before any
    /// generation work starts.
    fn generate_key_pair(&self, size_bits: Option<usize>) -> Result<KeyPair> {
        let bits = size_bits.unwrap_or_else(|| self.default_key_size_bits());
        if bits < MIN_ASYMMETRIC_KEY_SIZE_BITS || !self.supports_key_size(bits) {
            tracing::debug!(bits, "rejected asymmetric key size");
            return Err(Error::InvalidKeySize(bits));
        }
        self.generate_key_pair_unchecked(bits)
    }

    /// Wrap a payload (typically a key share) under a PEM public key.
    fn encrypt_with_public_key(&self, payload: &Binary, public_key_pem: &str) -> Result<Binary>;

    /// Unwrap a payload with a PEM private key.
    fn decrypt_with_private_key(&self, ciphertext: &Binary, private_key_pem: &str) -> Result<Binary>;

    /// Canonical PEM form of a generated pair.
    fn to_pem_pair(&self, pair: &KeyPair) -> Result<PemKeyPair>;
}

// ---------------------------------------------------------------------------
// Forwarding impls so one provider can back several components
// ---------------------------------------------------------------------------

macro_rules! forward_crypto_service {
    ($ty:ty) => {
        impl<S: CryptoService + ?Sized> CryptoService for $ty {
            fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
                (**self).random_bytes(len)
            }

            fn encrypt(
                &self,
                payload: &Binary,
                key: &Binary,
                iv: &Binary,
                algorithm: SymmetricAlgorithm,
            ) -> Result<EncryptResult> {
                (**self).encrypt(payload, key, iv, algorithm)
            }

            fn decrypt(
                &self,
                payload: &Binary,
                key: &Binary,
                iv: &Binary,
                algorithm: SymmetricAlgorithm,
                auth_tag: Option<&Binary>,
            ) -> Result<DecryptResult> {
                (**self).decrypt(payload, key, iv, algorithm, auth_tag)
            }

            fn sha256(&self, content: &str) -> String {
                (**self).sha256(content)
            }

            fn hmac(&self, key_hex: &str, content: &str) -> Result<String> {
                (**self).hmac(key_hex, content)
            }

            fn supports_key_size(&self, bits: usize) -> bool {
                (**self).supports_key_size(bits)
            }

            fn default_key_size_bits(&self) -> usize {
                (**self).default_key_size_bits()
            }

            fn generate_key_pair_unchecked(&self, bits: usize) -> Result<KeyPair> {
                (**self).generate_key_pair_unchecked(bits)
            }

            fn generate_key_pair(&self, size_bits: Option<usize>) -> Result<KeyPair> {
                (**self).generate_key_pair(size_bits)
            }

            fn encrypt_with_public_key(&self, payload: &Binary, public_key_pem: &str) -> Result<Binary> {
                (**self).encrypt_with_public_key(payload, public_key_pem)
            }

            fn decrypt_with_private_key(&self, ciphertext: &Binary, private_key_pem: &str) -> Result<Binary> {
                (**self).decrypt_with_private_key(ciphertext, private_key_pem)
            }

            fn to_pem_pair(&self, pair: &KeyPair) -> Result<PemKeyPair> {
                (**self).to_pem_pair(pair)
            }
        }
    };
}

forward_crypto_service!(Arc<S>);
forward_crypto_service!(&S);
forward_crypto_service!(Box<S>);
