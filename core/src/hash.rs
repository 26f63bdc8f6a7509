use std::{fmt::Display, str::FromStr};

use digest::Digest as _;
use md4::Md4;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use sha3::Sha3_256;

use crate::{error::RangecrackError, Digest};

/// All the supported hash functions.
#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HashFunction {
    Md4,
    #[default]
    Md5,
    Sha1,
    Sha2_256,
    Sha2_512,
    Sha3_256,
}

impl HashFunction {
    /// Hashes a byte slice using the right hash function.
    #[inline]
    pub fn digest(&self, password: &[u8]) -> Digest {
        match self {
            Self::Md4 => Md4::digest(password).to_vec(),
            Self::Md5 => Md5::digest(password).to_vec(),
            Self::Sha1 => Sha1::digest(password).to_vec(),
            Self::Sha2_256 => Sha256::digest(password).to_vec(),
            Self::Sha2_512 => Sha512::digest(password).to_vec(),
            Self::Sha3_256 => Sha3_256::digest(password).to_vec(),
        }
    }

    /// Gets the digest size in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            Self::Md4 => Md4::output_size(),
            Self::Md5 => Md5::output_size(),
            Self::Sha1 => Sha1::output_size(),
            Self::Sha2_256 => Sha256::output_size(),
            Self::Sha2_512 => Sha512::output_size(),
            Self::Sha3_256 => Sha3_256::output_size(),
        }
    }

    /// Decodes a hexadecimal digest produced by this hash function.
    /// The hexadecimal string is case-insensitive.
    pub fn parse_digest(&self, hex_digest: &str) -> Result<Digest, RangecrackError> {
        let digest = hex::decode(hex_digest).map_err(|_| {
            RangecrackError::InvalidInput("the digest is not valid hexadecimal".to_owned())
        })?;

        if digest.len() != self.digest_size() {
            return Err(RangecrackError::InvalidInput(format!(
                "a {self} digest is {} hexadecimal characters long",
                self.digest_size() * 2
            )));
        }

        Ok(digest)
    }
}

impl Display for HashFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Md4 => "md4",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha2_256 => "sha2_256",
            Self::Sha2_512 => "sha2_512",
            Self::Sha3_256 => "sha3_256",
        };

        write!(f, "{name}")
    }
}

impl FromStr for HashFunction {
    type Err = RangecrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md4" => Ok(Self::Md4),
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha2_256" | "sha256" => Ok(Self::Sha2_256),
            "sha2_512" | "sha512" => Ok(Self::Sha2_512),
            "sha3_256" => Ok(Self::Sha3_256),
            _ => Err(RangecrackError::InvalidInput(format!(
                "unsupported hash function {s}"
            ))),
        }
    }
}
