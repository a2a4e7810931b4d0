//! Scheme-tagged public keys, address derivation and verification.

use crate::address::IotaAddress;
use crate::error::CryptoError;
use crate::intent::{intent_digest, personal_message_bytes, IntentScope};
use crate::scheme::{SignatureScheme, SIGNATURE_LENGTH};
use crate::signature::{parse_serialized_signature, ParsedSignature, SignatureInput};
use iota_bcs::encoding::{from_base64, to_base64};
use std::fmt;
use tracing::debug;

/// Anything that can check a signature over a 32-byte digest.
///
/// Implementors supply [`SignatureVerifier::verify`]; the intent-scoped
/// helpers wrap the message, hash it with Blake2b-256 and verify the digest.
/// A malformed or mismatched signature yields `false`, never an error.
pub trait SignatureVerifier {
    fn verify<'a>(&self, data: &[u8], signature: impl Into<SignatureInput<'a>>) -> bool;

    fn verify_with_intent<'a>(
        &self,
        bytes: &[u8],
        signature: impl Into<SignatureInput<'a>>,
        scope: IntentScope,
    ) -> bool {
        self.verify(&intent_digest(scope, bytes), signature)
    }

    fn verify_personal_message<'a>(
        &self,
        message: &[u8],
        signature: impl Into<SignatureInput<'a>>,
    ) -> bool {
        self.verify_with_intent(
            &personal_message_bytes(message),
            signature,
            IntentScope::PersonalMessage,
        )
    }

    fn verify_transaction<'a>(
        &self,
        tx_bytes: &[u8],
        signature: impl Into<SignatureInput<'a>>,
    ) -> bool {
        self.verify_with_intent(tx_bytes, signature, IntentScope::TransactionData)
    }
}

/// A single-signer public key: scheme plus raw key bytes.
///
/// Two keys are equal when both the scheme and the raw bytes match.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey {
    scheme: SignatureScheme,
    bytes: Vec<u8>,
}

impl PublicKey {
    /// Wrap raw key bytes, checking the length the scheme requires.
    pub fn new(scheme: SignatureScheme, bytes: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        let bytes = bytes.into();
        if scheme == SignatureScheme::MultiSig {
            return Err(CryptoError::SchemeMismatch {
                expected: "single-signer",
                actual: scheme.name(),
            });
        }
        match scheme.public_key_length() {
            Some(expected) if bytes.len() != expected => Err(CryptoError::InvalidKeyLength {
                scheme: scheme.name(),
                expected,
                actual: bytes.len(),
            }),
            None if bytes.is_empty() => Err(CryptoError::InvalidPublicKey),
            _ => Ok(Self { scheme, bytes }),
        }
    }

    /// Key bytes produced by our own keypairs, already the right length.
    pub(crate) fn from_trusted(scheme: SignatureScheme, bytes: Vec<u8>) -> Self {
        Self { scheme, bytes }
    }

    pub fn ed25519(bytes: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        Self::new(SignatureScheme::Ed25519, bytes)
    }

    pub fn secp256k1(bytes: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        Self::new(SignatureScheme::Secp256k1, bytes)
    }

    pub fn secp256r1(bytes: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        Self::new(SignatureScheme::Secp256r1, bytes)
    }

    /// Raw key bytes in base64.
    pub fn from_base64(scheme: SignatureScheme, encoded: &str) -> Result<Self, CryptoError> {
        Self::new(scheme, from_base64(encoded)?)
    }

    /// Parse `flag || raw key bytes`.
    pub fn from_iota_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let (flag, raw) = bytes.split_first().ok_or(CryptoError::InvalidPublicKey)?;
        Self::new(SignatureScheme::from_flag(*flag)?, raw)
    }

    /// Parse the base64 of `flag || raw key bytes`.
    pub fn from_iota_public_key(encoded: &str) -> Result<Self, CryptoError> {
        Self::from_iota_bytes(&from_base64(encoded)?)
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn flag(&self) -> u8 {
        self.scheme.flag()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_raw_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn to_base64(&self) -> String {
        to_base64(&self.bytes)
    }

    /// `flag || raw key bytes`.
    pub fn to_iota_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bytes.len() + 1);
        out.push(self.flag());
        out.extend_from_slice(&self.bytes);
        out
    }

    pub fn to_iota_public_key(&self) -> String {
        to_base64(&self.to_iota_bytes())
    }

    /// Bytes hashed into the address. Ed25519 keys are hashed without the
    /// scheme flag; every other scheme keeps it.
    pub fn to_iota_bytes_for_address(&self) -> Vec<u8> {
        if self.scheme == SignatureScheme::Ed25519 {
            self.bytes.clone()
        } else {
            self.to_iota_bytes()
        }
    }

    pub fn to_address(&self) -> IotaAddress {
        IotaAddress::derive(&self.to_iota_bytes_for_address())
    }

    /// Check a raw 64-byte signature over `data`.
    pub fn verify_raw(&self, data: &[u8], signature: &[u8]) -> bool {
        if signature.len() != SIGNATURE_LENGTH {
            debug!(len = signature.len(), "signature has the wrong length");
            return false;
        }
        let result = match self.scheme {
            SignatureScheme::Ed25519 => crate::ed25519::verify(&self.bytes, data, signature),
            SignatureScheme::Secp256k1 => crate::secp256k1::verify(&self.bytes, data, signature),
            SignatureScheme::Secp256r1 => crate::secp256r1::verify(&self.bytes, data, signature),
            other => {
                debug!(scheme = %other, "verification not supported for scheme");
                return false;
            }
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!(scheme = %self.scheme, error = %e, "signature rejected");
                false
            }
        }
    }
}

impl SignatureVerifier for PublicKey {
    /// Serialized signatures must carry this key's scheme and bytes.
    fn verify<'a>(&self, data: &[u8], signature: impl Into<SignatureInput<'a>>) -> bool {
        match signature.into() {
            SignatureInput::Raw(raw) => self.verify_raw(data, raw),
            SignatureInput::Serialized(serialized) => match parse_serialized_signature(serialized) {
                Ok(ParsedSignature::Single {
                    signature,
                    public_key,
                    ..
                }) if &public_key == self => self.verify_raw(data, &signature),
                Ok(parsed) => {
                    debug!(scheme = %parsed.scheme(), "signature does not belong to this key");
                    false
                }
                Err(e) => {
                    debug!(error = %e, "unparseable serialized signature");
                    false
                }
            },
        }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}, {})", self.scheme, self.to_base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_checks() {
        assert!(PublicKey::ed25519([1u8; 32]).is_ok());
        assert_eq!(
            PublicKey::ed25519([1u8; 33]),
            Err(CryptoError::InvalidKeyLength {
                scheme: "ED25519",
                expected: 32,
                actual: 33
            })
        );
        assert!(PublicKey::secp256k1([2u8; 32]).is_err());
        assert!(PublicKey::new(SignatureScheme::MultiSig, vec![0u8; 10]).is_err());
        assert!(PublicKey::new(SignatureScheme::ZkLogin, Vec::new()).is_err());
    }

    #[test]
    fn test_iota_bytes_roundtrip() {
        let key = PublicKey::secp256r1([2u8; 33]).unwrap();
        let iota = key.to_iota_bytes();
        assert_eq!(iota[0], 0x02);
        assert_eq!(PublicKey::from_iota_bytes(&iota).unwrap(), key);
        assert_eq!(PublicKey::from_iota_public_key(&key.to_iota_public_key()).unwrap(), key);
        assert!(PublicKey::from_iota_bytes(&[]).is_err());
    }

    #[test]
    fn test_equality_includes_scheme() {
        let k1 = PublicKey::secp256k1([2u8; 33]).unwrap();
        let r1 = PublicKey::secp256r1([2u8; 33]).unwrap();
        assert_ne!(k1, r1);
        assert_eq!(k1.as_bytes(), r1.as_bytes());
    }

    #[test]
    fn test_ed25519_address_skips_flag() {
        let key = PublicKey::ed25519([7u8; 32]).unwrap();
        assert_eq!(key.to_iota_bytes_for_address(), vec![7u8; 32]);
        assert_eq!(key.to_address(), IotaAddress::derive(&[7u8; 32]));

        let k1 = PublicKey::secp256k1([2u8; 33]).unwrap();
        assert_eq!(k1.to_iota_bytes_for_address()[0], 0x01);
    }

    #[test]
    fn test_verify_rejects_malformed_input() {
        let key = PublicKey::ed25519([7u8; 32]).unwrap();
        assert!(!key.verify(b"data", &[0u8; 10][..]));
        assert!(!key.verify(b"data", "not base64!"));
        let zk = PublicKey::new(SignatureScheme::ZkLogin, vec![1, 2, 3]).unwrap();
        assert!(!zk.verify_raw(b"data", &[0u8; 64]));
    }
}
