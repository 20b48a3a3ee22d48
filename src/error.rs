//! Unified error type for the envelope core.
//!
//! Every component returns [`Error`]; provider failures travel up through the
//! cipher, splitter and envelope layers unchanged.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Cipher or service misconfigured (zero-length IV/key, bad config source).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Asymmetric key size below the floor or not supported by the provider.
    #[error("Invalid key size requested: {0} bits")]
    InvalidKeySize(usize),

    /// The OS random source failed.
    #[error("random source unavailable")]
    Entropy,

    /// AEAD tag or envelope signature did not verify.
    ///
    /// Never folded into [`Error::Crypto`]: it signals tampering or corruption.
    #[error("authentication failed")]
    Authentication,

    /// Share set is empty or does not line up with its counterpart.
    #[error("invalid share count: {0}")]
    ShareCount(&'static str),

    /// Shares (or XOR operands) of different lengths.
    #[error("share length mismatch: expected {expected} bytes, found {found}")]
    ShareLength { expected: usize, found: usize },

    /// Everything else the provider rejects: malformed input, unknown
    /// algorithm identifiers, backend failures.
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl Error {
    pub(crate) fn crypto(msg: impl Into<String>) -> Self {
        Self::Crypto(msg.into())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Self::Configuration(e.to_string())
    }
}
