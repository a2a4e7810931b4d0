//! Text encodings for BCS byte buffers.

use crate::error::BcsError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::str::FromStr;

/// String encodings a writer can emit and a reader can accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Encoding {
    #[default]
    Hex,
    Base64,
    Base58,
}

impl Encoding {
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
            Encoding::Base58 => "base58",
        }
    }

    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Hex => to_hex(bytes),
            Encoding::Base64 => to_base64(bytes),
            Encoding::Base58 => to_base58(bytes),
        }
    }

    pub fn decode(&self, data: &str) -> Result<Vec<u8>, BcsError> {
        match self {
            Encoding::Hex => from_hex(data),
            Encoding::Base64 => from_base64(data),
            Encoding::Base58 => from_base58(data),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = BcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Encoding::Hex),
            "base64" => Ok(Encoding::Base64),
            "base58" => Ok(Encoding::Base58),
            other => Err(BcsError::InvalidEncoding {
                encoding: "encoding name",
                reason: format!("unknown encoding '{}'", other),
            }),
        }
    }
}

/// Lowercase hex without prefix.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex, accepting an optional `0x` prefix and an odd number of digits.
pub fn from_hex(data: &str) -> Result<Vec<u8>, BcsError> {
    let data = data
        .strip_prefix("0x")
        .or_else(|| data.strip_prefix("0X"))
        .unwrap_or(data);
    if data.len() % 2 == 1 {
        return Ok(hex::decode(format!("0{}", data))?);
    }
    Ok(hex::decode(data)?)
}

pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn from_base64(data: &str) -> Result<Vec<u8>, BcsError> {
    Ok(STANDARD.decode(data)?)
}

pub fn to_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

pub fn from_base58(data: &str) -> Result<Vec<u8>, BcsError> {
    Ok(bs58::decode(data).into_vec()?)
}
