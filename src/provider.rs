//! Default [`CryptoService`] over RustCrypto primitives.
//!
//! - AES-256-GCM (12, 16 or 32 byte IV, 16 byte tag)
//! - AES-256-CBC (16 byte IV, PKCS#7, no tag)
//! - SHA-256 / HMAC-SHA256, hex encoded
//! - RSA key generation, RSA-OAEP(SHA-256) wrap/unwrap

use aes_gcm::aead::consts::{U12, U16, U32};
use aes_gcm::aead::generic_array::{ArrayLength, GenericArray};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rsa::{Oaep, RsaPrivateKey};
use sha2::{Digest, Sha256};

use crate::algorithm::SymmetricAlgorithm;
use crate::binary::Binary;
use crate::config::CryptoConfig;
use crate::error::{Error, Result};
use crate::keypair::{self, KeyPair, PemKeyPair, MAX_ASYMMETRIC_KEY_SIZE_BITS, MIN_ASYMMETRIC_KEY_SIZE_BITS};
use crate::random;
use crate::service::{CryptoService, DecryptResult, EncryptResult};
use crate::wire::{KEY_BYTES, TAG_BYTES};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

const CBC_IV_BYTES: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct RustCryptoService {
    default_key_size_bits: Option<usize>,
}

impl RustCryptoService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CryptoConfig) -> Self {
        Self {
            default_key_size_bits: Some(config.default_key_size_bits),
        }
    }
}

impl CryptoService for RustCryptoService {
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>> {
        random::random_bytes(len)
    }

    fn encrypt(
        &self,
        payload: &Binary,
        key: &Binary,
        iv: &Binary,
        algorithm: SymmetricAlgorithm,
    ) -> Result<EncryptResult> {
        check_key(key)?;
        match algorithm {
            SymmetricAlgorithm::Aes256Gcm => {
                let mut sealed = gcm_seal(key.as_bytes(), iv.as_bytes(), payload.as_bytes())?;
                let tag = sealed.split_off(sealed.len() - TAG_BYTES);
                Ok(EncryptResult {
                    payload: Binary::from_bytes(sealed),
                    auth_tag: Some(Binary::from_bytes(tag)),
                })
            }
            SymmetricAlgorithm::Aes256Cbc => {
                check_cbc_iv(iv)?;
                let ct = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv.as_bytes())
                    .map_err(|_| Error::crypto("invalid CBC key or IV"))?
                    .encrypt_padded_vec_mut::<Pkcs7>(payload.as_bytes());
                Ok(EncryptResult {
                    payload: Binary::from_bytes(ct),
                    auth_tag: None,
                })
            }
        }
    }

    fn decrypt(
        &self,
        payload: &Binary,
        key: &Binary,
        iv: &Binary,
        algorithm: SymmetricAlgorithm,
        auth_tag: Option<&Binary>,
    ) -> Result<DecryptResult> {
        check_key(key)?;
        match algorithm {
            SymmetricAlgorithm::Aes256Gcm => {
                let tag = auth_tag.ok_or_else(|| Error::crypto("AES-256-GCM decrypt requires a tag"))?;
                if tag.len() != TAG_BYTES {
                    return Err(Error::crypto(format!(
                        "tag must be {} bytes, got {}",
                        TAG_BYTES,
                        tag.len()
                    )));
                }
                let mut sealed = Vec::with_capacity(payload.len() + TAG_BYTES);
                sealed.extend_from_slice(payload.as_bytes());
                sealed.extend_from_slice(tag.as_bytes());
                let pt = gcm_open(key.as_bytes(), iv.as_bytes(), &sealed)?;
                Ok(DecryptResult {
                    payload: Binary::from_bytes(pt),
                })
            }
            SymmetricAlgorithm::Aes256Cbc => {
                check_cbc_iv(iv)?;
                let pt = Aes256CbcDec::new_from_slices(key.as_bytes(), iv.as_bytes())
                    .map_err(|_| Error::crypto("invalid CBC key or IV"))?
                    .decrypt_padded_vec_mut::<Pkcs7>(payload.as_bytes())
                    .map_err(|_| Error::crypto("invalid CBC padding"))?;
                Ok(DecryptResult {
                    payload: Binary::from_bytes(pt),
                })
            }
        }
    }

    fn sha256(&self, content: &str) -> String {
        hex::encode(Sha256::digest(content.as_bytes()))
    }

    fn hmac(&self, key_hex: &str, content: &str) -> Result<String> {
        let key = zeroize::Zeroizing::new(
            hex::decode(key_hex).map_err(|e| Error::crypto(format!("hmac key is not hex: {}", e)))?,
        );
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&key).map_err(|_| Error::crypto("hmac key"))?;
        mac.update(content.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Byte-aligned moduli the backend can both generate and re-parse.
    fn supports_key_size(&self, bits: usize) -> bool {
        (MIN_ASYMMETRIC_KEY_SIZE_BITS..=MAX_ASYMMETRIC_KEY_SIZE_BITS).contains(&bits) && bits % 8 == 0
    }

    fn default_key_size_bits(&self) -> usize {
        self.default_key_size_bits
            .unwrap_or(keypair::DEFAULT_KEY_SIZE_BITS)
    }

    fn generate_key_pair_unchecked(&self, bits: usize) -> Result<KeyPair> {
        tracing::debug!(bits, "generating RSA key pair");
        let private = random::with_entropy(|rng| RsaPrivateKey::new(rng, bits))?
            .map_err(|e| Error::crypto(format!("RSA key generation: {}", e)))?;
        Ok(KeyPair::from_private(private))
    }

    fn encrypt_with_public_key(&self, payload: &Binary, public_key_pem: &str) -> Result<Binary> {
        let public = keypair::parse_public_pem(public_key_pem)?;
        random::with_entropy(|rng| public.encrypt(rng, Oaep::new::<Sha256>(), payload.as_bytes()))?
            .map(Binary::from_bytes)
            .map_err(|e| Error::crypto(format!("RSA-OAEP encrypt: {}", e)))
    }

    fn decrypt_with_private_key(&self, ciphertext: &Binary, private_key_pem: &str) -> Result<Binary> {
        let private = keypair::parse_private_pem(private_key_pem)?;
        private
            .decrypt(Oaep::new::<Sha256>(), ciphertext.as_bytes())
            .map(Binary::from_bytes)
            .map_err(|e| Error::crypto(format!("RSA-OAEP decrypt: {}", e)))
    }

    fn to_pem_pair(&self, pair: &KeyPair) -> Result<PemKeyPair> {
        pair.to_pem()
    }
}

// ---------------------------------------------------------------------------
// AES helpers
// ---------------------------------------------------------------------------

fn check_key(key: &Binary) -> Result<()> {
    if key.len() != KEY_BYTES {
        return Err(Error::crypto(format!(
            "AES-256 key must be {} bytes, got {}",
            KEY_BYTES,
            key.len()
        )));
    }
    Ok(())
}

fn check_cbc_iv(iv: &Binary) -> Result<()> {
    if iv.len() != CBC_IV_BYTES {
        return Err(Error::crypto(format!(
            "AES-256-CBC IV must be {} bytes, got {}",
            CBC_IV_BYTES,
            iv.len()
        )));
    }
    Ok(())
}

/// Returns `ciphertext || tag`.
fn gcm_seal(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    match iv.len() {
        12 => gcm_seal_sized::<U12>(key, iv, plaintext),
        16 => gcm_seal_sized::<U16>(key, iv, plaintext),
        32 => gcm_seal_sized::<U32>(key, iv, plaintext),
        n => Err(unsupported_iv(n)),
    }
}

/// Takes `ciphertext || tag`.
fn gcm_open(key: &[u8], iv: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    match iv.len() {
        12 => gcm_open_sized::<U12>(key, iv, sealed),
        16 => gcm_open_sized::<U16>(key, iv, sealed),
        32 => gcm_open_sized::<U32>(key, iv, sealed),
        n => Err(unsupported_iv(n)),
    }
}

fn gcm_seal_sized<N: ArrayLength<u8>>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = <AesGcm<Aes256, N> as KeyInit>::new_from_slice(key).map_err(|_| Error::crypto("invalid GCM key"))?;
    let nonce = GenericArray::<u8, N>::from_slice(iv);
    let payload = Payload { msg: plaintext, aad: &[] };
    cipher
        .encrypt(nonce, payload)
        .map_err(|_| Error::crypto("AES-256-GCM encrypt failed"))
}

fn gcm_open_sized<N: ArrayLength<u8>>(key: &[u8], iv: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    let cipher = <AesGcm<Aes256, N> as KeyInit>::new_from_slice(key).map_err(|_| Error::crypto("invalid GCM key"))?;
    let nonce = GenericArray::<u8, N>::from_slice(iv);
    let payload = Payload { msg: sealed, aad: &[] };
    cipher.decrypt(nonce, payload).map_err(|_| Error::Authentication)
}

fn unsupported_iv(len: usize) -> Error {
    Error::crypto(format!("unsupported AES-256-GCM IV length: {} bytes", len))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "72f47a5f6bcb1b96a9d77b2c2f1463395d4a3a325fada6290fc0fef7bcddb58e";

    fn key() -> Binary {
        Binary::from_bytes(hex::decode(KEY_HEX).unwrap())
    }

    #[test]
    fn gcm_tag_is_split_off() {
        let svc = RustCryptoService::new();
        let out = svc
            .encrypt(&Binary::from_string("hello"), &key(), &Binary::from_bytes(vec![0u8; 12]), SymmetricAlgorithm::Aes256Gcm)
            .unwrap();
        assert_eq!(out.payload.len(), 5);
        assert_eq!(out.auth_tag.unwrap().len(), TAG_BYTES);
    }

    #[test]
    fn gcm_requires_tag_on_decrypt() {
        let svc = RustCryptoService::new();
        let err = svc
            .decrypt(&Binary::from_bytes(vec![1u8]), &key(), &Binary::from_bytes(vec![0u8; 12]), SymmetricAlgorithm::Aes256Gcm, None)
            .unwrap_err();
        assert!(matches!(err, Error::Crypto(_)));
    }

    #[test]
    fn gcm_rejects_odd_iv_length() {
        let svc = RustCryptoService::new();
        let err = svc
            .encrypt(&Binary::from_string("x"), &key(), &Binary::from_bytes(vec![0u8; 7]), SymmetricAlgorithm::Aes256Gcm)
            .unwrap_err();
        assert!(matches!(err, Error::Crypto(_)));
    }

    #[test]
    fn short_key_rejected() {
        let svc = RustCryptoService::new();
        let err = svc
            .encrypt(&Binary::from_string("x"), &Binary::from_bytes(vec![0u8; 16]), &Binary::from_bytes(vec![0u8; 12]), SymmetricAlgorithm::Aes256Gcm)
            .unwrap_err();
        assert!(matches!(err, Error::Crypto(_)));
    }

    #[test]
    fn cbc_has_no_tag_and_roundtrips() {
        let svc = RustCryptoService::new();
        let iv = Binary::from_bytes(vec![7u8; 16]);
        let out = svc
            .encrypt(&Binary::from_string("cbc payload"), &key(), &iv, SymmetricAlgorithm::Aes256Cbc)
            .unwrap();
        assert!(out.auth_tag.is_none());
        assert_eq!(out.payload.len(), 16);

        let pt = svc
            .decrypt(&out.payload, &key(), &iv, SymmetricAlgorithm::Aes256Cbc, None)
            .unwrap();
        assert_eq!(pt.payload.as_str().unwrap(), "cbc payload");
    }

    #[test]
    fn cbc_rejects_gcm_sized_iv() {
        let svc = RustCryptoService::new();
        let err = svc
            .encrypt(&Binary::from_string("x"), &key(), &Binary::from_bytes(vec![0u8; 12]), SymmetricAlgorithm::Aes256Cbc)
            .unwrap_err();
        assert!(matches!(err, Error::Crypto(_)));
    }

    #[test]
    fn hmac_rejects_non_hex_key() {
        let svc = RustCryptoService::new();
        assert!(matches!(svc.hmac("zz", "a"), Err(Error::Crypto(_))));
    }

    #[test]
    fn supported_sizes() {
        let svc = RustCryptoService::new();
        assert!(svc.supports_key_size(2048));
        assert!(svc.supports_key_size(2056));
        assert!(svc.supports_key_size(4096));
        assert!(!svc.supports_key_size(2049));
        assert!(!svc.supports_key_size(2000));
        assert!(!svc.supports_key_size(8192));
    }

    #[test]
    fn configured_default_key_size() {
        let cfg = CryptoConfig {
            default_key_size_bits: 3072,
            ..CryptoConfig::default()
        };
        assert_eq!(RustCryptoService::with_config(&cfg).default_key_size_bits(), 3072);
        assert_eq!(RustCryptoService::new().default_key_size_bits(), 2048);
    }

    #[test]
    fn undersized_request_never_reaches_generation() {
        let svc = RustCryptoService::new();
        assert_eq!(svc.generate_key_pair(Some(1)).unwrap_err(), Error::InvalidKeySize(1));
        assert_eq!(svc.generate_key_pair(Some(2049)).unwrap_err(), Error::InvalidKeySize(2049));
    }
}
