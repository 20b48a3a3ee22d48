//! Runtime configuration for the cipher and the default provider.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::keypair::{DEFAULT_KEY_SIZE_BITS, MIN_ASYMMETRIC_KEY_SIZE_BITS};
use crate::wire::{IV_BYTES, KEY_BYTES};

/// Environment variable prefix, e.g. `TDF_CRYPTO_IV_LENGTH`.
pub const ENV_PREFIX: &str = "TDF_CRYPTO";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CryptoConfig {
    /// IV length in bytes produced by `generate_initialization_vector`.
    #[serde(default = "default_iv_length")]
    pub iv_length: usize,

    /// Symmetric key length in bytes produced by `generate_key`.
    #[serde(default = "default_key_length")]
    pub key_length: usize,

    /// RSA modulus size used when a caller does not ask for one.
    #[serde(default = "default_key_size_bits")]
    pub default_key_size_bits: usize,
}

fn default_iv_length() -> usize {
    IV_BYTES
}
fn default_key_length() -> usize {
    KEY_BYTES
}
fn default_key_size_bits() -> usize {
    DEFAULT_KEY_SIZE_BITS
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            iv_length: default_iv_length(),
            key_length: default_key_length(),
            default_key_size_bits: default_key_size_bits(),
        }
    }
}

impl CryptoConfig {
    /// Load and validate configuration from `TDF_CRYPTO_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let c: CryptoConfig = cfg.try_deserialize()?;
        c.validate()?;
        Ok(c)
    }

    pub fn validate(&self) -> Result<()> {
        if self.iv_length == 0 {
            return Err(Error::Configuration("iv_length must be non-zero".into()));
        }
        if self.key_length == 0 {
            return Err(Error::Configuration("key_length must be non-zero".into()));
        }
        if self.default_key_size_bits < MIN_ASYMMETRIC_KEY_SIZE_BITS {
            return Err(Error::InvalidKeySize(self.default_key_size_bits));
        }
        Ok(())
    }
}
