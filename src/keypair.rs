//! Asymmetric key pairs and their PEM form.
//!
//! Public keys serialize as SPKI (`BEGIN PUBLIC KEY`), private keys as
//! PKCS#8 (`BEGIN PRIVATE KEY`).

use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Hard floor for asymmetric modulus size.
pub const MIN_ASYMMETRIC_KEY_SIZE_BITS: usize = 2048;

/// Modulus size used when the caller does not ask for one.
pub const DEFAULT_KEY_SIZE_BITS: usize = 2048;

/// Largest modulus the RSA backend will parse back from PEM.
pub const MAX_ASYMMETRIC_KEY_SIZE_BITS: usize = 4096;

/// A generated RSA key pair. The private half zeroizes on drop.
#[derive(Clone)]
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl KeyPair {
    pub(crate) fn from_private(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        Self { private, public }
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    /// Modulus size in bits.
    pub fn size_bits(&self) -> usize {
        self.public.n().bits()
    }

    pub fn public_key_pem(&self) -> Result<String> {
        self.public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| Error::crypto(format!("public key PEM encoding: {}", e)))
    }

    pub fn private_key_pem(&self) -> Result<Zeroizing<String>> {
        self.private
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| Error::crypto(format!("private key PEM encoding: {}", e)))
    }

    pub fn to_pem(&self) -> Result<PemKeyPair> {
        Ok(PemKeyPair {
            public_key: self.public_key_pem()?,
            private_key: self.private_key_pem()?,
        })
    }
}

impl core::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeyPair")
            .field("size_bits", &self.size_bits())
            .finish_non_exhaustive()
    }
}

/// PEM text for both halves of a key pair.
#[derive(Clone)]
pub struct PemKeyPair {
    pub public_key: String,
    pub private_key: Zeroizing<String>,
}

impl core::fmt::Debug for PemKeyPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PemKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

pub(crate) fn parse_public_pem(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .map_err(|e| Error::crypto(format!("invalid public key PEM: {}", e)))
}

pub(crate) fn parse_private_pem(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .map_err(|e| Error::crypto(format!("invalid private key PEM: {}", e)))
}
