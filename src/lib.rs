//! # tdf-envelope
//!
//! Cryptographic core of a TDF-style data-protection envelope.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tdf_envelope::{Binary, CryptoService, Envelope, Recipient};
//!
//! let envelope = Envelope::default();
//! let pair = envelope.service().generate_key_pair(None).unwrap();
//! let pem = envelope.service().to_pem_pair(&pair).unwrap();
//!
//! let recipients = [Recipient::new("kas-1", pem.public_key.clone())];
//! let sealed = envelope.seal(&Binary::from_string("secret"), &recipients).unwrap();
//! let opened = envelope.open(&sealed, &[pem.private_key.as_str()]).unwrap();
//!
//! assert_eq!(opened.as_str().unwrap(), "secret");
//! ```
//!
//! ## Pieces
//!
//! - **Cipher**: AES-256-GCM framed as `iv[12] || ciphertext || tag[16]`
//! - **Key split**: XOR shares, all required to recover the key
//! - **Crypto service**: injected provider for randomness, hashing, AEAD and
//!   RSA-OAEP share wrapping
//! - **Envelope**: composition of the three
//!
//! ## What's NOT Provided
//!
//! - Manifest / policy documents
//! - Network calls to key-access services
//! - Threshold (k-of-n) recovery
//! - Streaming / chunked payloads

#![deny(unsafe_code)]

mod error;
mod random;

pub mod algorithm;
pub mod binary;
pub mod cipher;
pub mod config;
pub mod envelope;
pub mod keypair;
pub mod keysplit;
pub mod provider;
pub mod service;
pub mod wire;

pub use algorithm::{SymmetricAlgorithm, ALGORITHMS, AES_256_CBC_URI, AES_256_GCM_URI};
pub use binary::Binary;
pub use cipher::{AesGcmCipher, SymmetricCipher};
pub use crate::config::CryptoConfig;
pub use envelope::{Envelope, Recipient, SealedEnvelope, WrappedShare};
pub use error::{Error, Result};
pub use keypair::{
    KeyPair, PemKeyPair, DEFAULT_KEY_SIZE_BITS, MAX_ASYMMETRIC_KEY_SIZE_BITS, MIN_ASYMMETRIC_KEY_SIZE_BITS,
};
pub use keysplit::{bxor, merge, split, split_with, Share};
pub use provider::RustCryptoService;
pub use service::{CryptoService, DecryptResult, EncryptResult};
