//! Symmetric algorithm identifiers (XML-Enc URIs).

use core::fmt;
use core::str::FromStr;

use crate::error::Error;

pub const AES_256_CBC_URI: &str = "http://www.w3.org/2001/04/xmlenc#aes256-cbc";
pub const AES_256_GCM_URI: &str = "http://www.w3.org/2009/xmlenc11#aes256-gcm";

/// Name → URI table for every recognized algorithm.
pub const ALGORITHMS: &[(&str, &str)] = &[
    ("AES_256_CBC", AES_256_CBC_URI),
    ("AES_256_GCM", AES_256_GCM_URI),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymmetricAlgorithm {
    Aes256Cbc,
    Aes256Gcm,
}

impl SymmetricAlgorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes256Cbc => "AES_256_CBC",
            Self::Aes256Gcm => "AES_256_GCM",
        }
    }

    pub const fn uri(self) -> &'static str {
        match self {
            Self::Aes256Cbc => AES_256_CBC_URI,
            Self::Aes256Gcm => AES_256_GCM_URI,
        }
    }

    /// Whether the algorithm produces an authentication tag.
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Aes256Gcm)
    }

    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        match uri {
            AES_256_CBC_URI => Ok(Self::Aes256Cbc),
            AES_256_GCM_URI => Ok(Self::Aes256Gcm),
            other => Err(Error::crypto(format!("unsupported algorithm identifier: {}", other))),
        }
    }
}

impl fmt::Display for SymmetricAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// Accepts either the table name or the URI.
impl FromStr for SymmetricAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uri = ALGORITHMS
            .iter()
            .find(|(name, _)| *name == s)
            .map_or(s, |(_, uri)| *uri);
        Self::from_uri(uri)
    }
}
