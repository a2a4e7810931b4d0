use crate::error::CryptoError;
use std::fmt;
use std::str::FromStr;

/// Length of every single-scheme signature on the wire.
pub const SIGNATURE_LENGTH: usize = 64;

/// Signature schemes and their one-byte wire flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignatureScheme {
    #[cfg_attr(feature = "serde", serde(rename = "ED25519"))]
    Ed25519,
    Secp256k1,
    Secp256r1,
    MultiSig,
    ZkLogin,
    Passkey,
}

impl SignatureScheme {
    pub const fn flag(&self) -> u8 {
        match self {
            SignatureScheme::Ed25519 => 0x00,
            SignatureScheme::Secp256k1 => 0x01,
            SignatureScheme::Secp256r1 => 0x02,
            SignatureScheme::MultiSig => 0x03,
            SignatureScheme::ZkLogin => 0x05,
            SignatureScheme::Passkey => 0x06,
        }
    }

    pub fn from_flag(flag: u8) -> Result<Self, CryptoError> {
        match flag {
            0x00 => Ok(SignatureScheme::Ed25519),
            0x01 => Ok(SignatureScheme::Secp256k1),
            0x02 => Ok(SignatureScheme::Secp256r1),
            0x03 => Ok(SignatureScheme::MultiSig),
            0x05 => Ok(SignatureScheme::ZkLogin),
            0x06 => Ok(SignatureScheme::Passkey),
            other => Err(CryptoError::UnknownSignatureScheme(other)),
        }
    }

    /// Name as used in BCS enum variants and serialized JSON.
    pub const fn name(&self) -> &'static str {
        match self {
            SignatureScheme::Ed25519 => "ED25519",
            SignatureScheme::Secp256k1 => "Secp256k1",
            SignatureScheme::Secp256r1 => "Secp256r1",
            SignatureScheme::MultiSig => "MultiSig",
            SignatureScheme::ZkLogin => "ZkLogin",
            SignatureScheme::Passkey => "Passkey",
        }
    }

    /// Raw public key size, or `None` for variable-length or aggregate schemes.
    pub const fn public_key_length(&self) -> Option<usize> {
        match self {
            SignatureScheme::Ed25519 => Some(32),
            SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1 | SignatureScheme::Passkey => {
                Some(33)
            }
            SignatureScheme::MultiSig | SignatureScheme::ZkLogin => None,
        }
    }

    /// Schemes whose serialized form is `flag || signature || public key`.
    pub const fn is_single(&self) -> bool {
        matches!(
            self,
            SignatureScheme::Ed25519 | SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1
        )
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureScheme {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(SignatureScheme::Ed25519),
            "secp256k1" => Ok(SignatureScheme::Secp256k1),
            "secp256r1" => Ok(SignatureScheme::Secp256r1),
            "multisig" => Ok(SignatureScheme::MultiSig),
            "zklogin" => Ok(SignatureScheme::ZkLogin),
            "passkey" => Ok(SignatureScheme::Passkey),
            _ => Err(CryptoError::UnknownSchemeName(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_roundtrip() {
        for scheme in [
            SignatureScheme::Ed25519,
            SignatureScheme::Secp256k1,
            SignatureScheme::Secp256r1,
            SignatureScheme::MultiSig,
            SignatureScheme::ZkLogin,
            SignatureScheme::Passkey,
        ] {
            assert_eq!(SignatureScheme::from_flag(scheme.flag()).unwrap(), scheme);
        }
    }

    #[test]
    fn test_unknown_flag() {
        assert_eq!(
            SignatureScheme::from_flag(0x04),
            Err(CryptoError::UnknownSignatureScheme(0x04))
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("ED25519".parse::<SignatureScheme>().unwrap(), SignatureScheme::Ed25519);
        assert_eq!("secp256r1".parse::<SignatureScheme>().unwrap(), SignatureScheme::Secp256r1);
        assert!("rsa".parse::<SignatureScheme>().is_err());
    }
}
