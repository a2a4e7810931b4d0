//! Signing keypairs and the bech32 `iotaprivkey` private key format.

use crate::address::IotaAddress;
use crate::ed25519::Ed25519Keypair;
use crate::error::CryptoError;
use crate::intent::{intent_digest, personal_message_bytes, IntentScope};
use crate::public_key::PublicKey;
use crate::scheme::SignatureScheme;
use crate::secp256k1::Secp256k1Keypair;
use crate::secp256r1::Secp256r1Keypair;
use crate::signature::to_serialized_signature;
use bech32::{Bech32, Hrp};
use iota_bcs::encoding::to_base64;
use zeroize::Zeroizing;

/// Human-readable part of bech32-encoded private keys.
pub const IOTA_PRIVATE_KEY_PREFIX: &str = "iotaprivkey";
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Base64 of the signed bytes together with the serialized signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureWithBytes {
    pub bytes: String,
    pub signature: String,
}

/// A key that produces raw 64-byte signatures.
///
/// The provided methods wrap the payload in an intent, sign the Blake2b-256
/// digest and return the serialized `flag || signature || public key` form.
pub trait Signer {
    fn scheme(&self) -> SignatureScheme;

    fn public_key(&self) -> PublicKey;

    /// Sign `data` as given, without any intent wrapping.
    fn sign(&self, data: &[u8]) -> Vec<u8>;

    fn address(&self) -> IotaAddress {
        self.public_key().to_address()
    }

    fn sign_with_intent(&self, bytes: &[u8], scope: IntentScope) -> SignatureWithBytes {
        let signature = self.sign(&intent_digest(scope, bytes));
        SignatureWithBytes {
            bytes: to_base64(bytes),
            signature: to_serialized_signature(&signature, &self.public_key()),
        }
    }

    fn sign_transaction(&self, tx_bytes: &[u8]) -> SignatureWithBytes {
        self.sign_with_intent(tx_bytes, IntentScope::TransactionData)
    }

    /// The returned `bytes` are the message itself, not its BCS form.
    fn sign_personal_message(&self, message: &[u8]) -> SignatureWithBytes {
        let signed = self.sign_with_intent(&personal_message_bytes(message), IntentScope::PersonalMessage);
        SignatureWithBytes {
            bytes: to_base64(message),
            signature: signed.signature,
        }
    }
}

/// Secret key and scheme recovered from a bech32 private key.
pub struct ParsedKeypair {
    pub scheme: SignatureScheme,
    pub secret_key: Zeroizing<[u8; PRIVATE_KEY_SIZE]>,
}

/// Decode `iotaprivkey1...` into its scheme and 32-byte secret.
pub fn decode_iota_private_key(value: &str) -> Result<ParsedKeypair, CryptoError> {
    let (hrp, data) = bech32::decode(value)?;
    let data = Zeroizing::new(data);
    if !hrp.as_str().eq_ignore_ascii_case(IOTA_PRIVATE_KEY_PREFIX) {
        return Err(CryptoError::PrivateKeyEncoding(format!(
            "invalid private key prefix: {}",
            hrp
        )));
    }
    let (flag, secret) = data
        .split_first()
        .ok_or_else(|| CryptoError::PrivateKeyEncoding("empty payload".into()))?;
    let scheme = SignatureScheme::from_flag(*flag)?;
    if !scheme.is_single() {
        return Err(CryptoError::PrivateKeyEncoding(format!(
            "{} keys cannot be imported",
            scheme
        )));
    }
    if secret.len() != PRIVATE_KEY_SIZE {
        return Err(CryptoError::PrivateKeyEncoding(format!(
            "expected a {}-byte secret key, got {}",
            PRIVATE_KEY_SIZE,
            secret.len()
        )));
    }
    let mut secret_key = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
    secret_key.copy_from_slice(secret);
    Ok(ParsedKeypair { scheme, secret_key })
}

/// Encode a 32-byte secret as `iotaprivkey1...` (classic bech32 checksum).
pub fn encode_iota_private_key(secret: &[u8], scheme: SignatureScheme) -> Result<String, CryptoError> {
    if secret.len() != PRIVATE_KEY_SIZE {
        return Err(CryptoError::InvalidPrivateKey);
    }
    let mut data = Zeroizing::new(Vec::with_capacity(PRIVATE_KEY_SIZE + 1));
    data.push(scheme.flag());
    data.extend_from_slice(secret);
    bech32::encode::<Bech32>(Hrp::parse_unchecked(IOTA_PRIVATE_KEY_PREFIX), &data)
        .map_err(|e| CryptoError::PrivateKeyEncoding(e.to_string()))
}

/// Any local single-scheme keypair.
#[derive(Clone, Debug)]
pub enum Keypair {
    Ed25519(Ed25519Keypair),
    Secp256k1(Secp256k1Keypair),
    Secp256r1(Secp256r1Keypair),
}

impl Keypair {
    pub fn generate(scheme: SignatureScheme) -> Result<Self, CryptoError> {
        match scheme {
            SignatureScheme::Ed25519 => Ok(Keypair::Ed25519(Ed25519Keypair::generate())),
            SignatureScheme::Secp256k1 => Ok(Keypair::Secp256k1(Secp256k1Keypair::generate())),
            SignatureScheme::Secp256r1 => Ok(Keypair::Secp256r1(Secp256r1Keypair::generate())),
            other => Err(CryptoError::SchemeMismatch {
                expected: "single-signer",
                actual: other.name(),
            }),
        }
    }

    pub fn from_secret_key(scheme: SignatureScheme, secret: &[u8]) -> Result<Self, CryptoError> {
        match scheme {
            SignatureScheme::Ed25519 => Ok(Keypair::Ed25519(Ed25519Keypair::from_secret_key(secret)?)),
            SignatureScheme::Secp256k1 => {
                Ok(Keypair::Secp256k1(Secp256k1Keypair::from_secret_key(secret)?))
            }
            SignatureScheme::Secp256r1 => {
                Ok(Keypair::Secp256r1(Secp256r1Keypair::from_secret_key(secret)?))
            }
            other => Err(CryptoError::SchemeMismatch {
                expected: "single-signer",
                actual: other.name(),
            }),
        }
    }

    /// Import a bech32 `iotaprivkey` string.
    pub fn from_bech32(value: &str) -> Result<Self, CryptoError> {
        let parsed = decode_iota_private_key(value)?;
        Self::from_secret_key(parsed.scheme, &parsed.secret_key[..])
    }

    pub fn to_bech32(&self) -> Result<String, CryptoError> {
        match self {
            Keypair::Ed25519(kp) => kp.secret_key(),
            Keypair::Secp256k1(kp) => kp.secret_key(),
            Keypair::Secp256r1(kp) => kp.secret_key(),
        }
    }

    fn inner(&self) -> &dyn Signer {
        match self {
            Keypair::Ed25519(kp) => kp,
            Keypair::Secp256k1(kp) => kp,
            Keypair::Secp256r1(kp) => kp,
        }
    }
}

impl Signer for Keypair {
    fn scheme(&self) -> SignatureScheme {
        self.inner().scheme()
    }

    fn public_key(&self) -> PublicKey {
        self.inner().public_key()
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        self.inner().sign(data)
    }
}

impl From<Ed25519Keypair> for Keypair {
    fn from(kp: Ed25519Keypair) -> Self {
        Keypair::Ed25519(kp)
    }
}

impl From<Secp256k1Keypair> for Keypair {
    fn from(kp: Secp256k1Keypair) -> Self {
        Keypair::Secp256k1(kp)
    }
}

impl From<Secp256r1Keypair> for Keypair {
    fn from(kp: Secp256r1Keypair) -> Self {
        Keypair::Secp256r1(kp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::public_key::SignatureVerifier;

    #[test]
    fn test_decode_known_ed25519_key() {
        let keypair =
            Keypair::from_bech32("iotaprivkey1qrqqxhsu3ndp96644fjk4z5ams5ulgmvprklngt2jhvg2ujn5w4q2d2vplv")
                .unwrap();
        assert_eq!(keypair.scheme(), SignatureScheme::Ed25519);
        assert_eq!(
            keypair.address().to_string(),
            "0x9f8e5379678525edf768d7b507dc1ba9016fc4f0eac976ab7f74077d95fba312"
        );
    }

    #[test]
    fn test_bech32_roundtrip_all_schemes() {
        for scheme in [
            SignatureScheme::Ed25519,
            SignatureScheme::Secp256k1,
            SignatureScheme::Secp256r1,
        ] {
            let keypair = Keypair::generate(scheme).unwrap();
            let encoded = keypair.to_bech32().unwrap();
            assert!(encoded.starts_with("iotaprivkey1"));
            let parsed = decode_iota_private_key(&encoded).unwrap();
            assert_eq!(parsed.scheme, scheme);
            let restored = Keypair::from_bech32(&encoded).unwrap();
            assert_eq!(restored.public_key(), keypair.public_key());
        }
    }

    #[test]
    fn test_rejects_bad_private_keys() {
        assert!(encode_iota_private_key(&[1u8; 31], SignatureScheme::Ed25519).is_err());
        let wrong_prefix = bech32::encode::<Bech32>(Hrp::parse_unchecked("suiprivkey"), &[0u8; 33]).unwrap();
        assert!(matches!(
            decode_iota_private_key(&wrong_prefix),
            Err(CryptoError::PrivateKeyEncoding(_))
        ));
        let multisig = encode_iota_private_key(&[1u8; 32], SignatureScheme::MultiSig).unwrap();
        assert!(decode_iota_private_key(&multisig).is_err());
        assert!(decode_iota_private_key("iotaprivkey1notbech32").is_err());
    }

    #[test]
    fn test_sign_personal_message() {
        let keypair = Keypair::generate(SignatureScheme::Secp256k1).unwrap();
        let signed = keypair.sign_personal_message(b"hello");
        assert_eq!(signed.bytes, to_base64(b"hello"));
        assert!(keypair.public_key().verify_personal_message(b"hello", &signed.signature));
        assert!(!keypair.public_key().verify_personal_message(b"hellp", &signed.signature));
    }

    #[test]
    fn test_sign_transaction() {
        let keypair = Keypair::generate(SignatureScheme::Ed25519).unwrap();
        let tx = [1u8, 2, 3, 4];
        let signed = keypair.sign_transaction(&tx);
        assert!(keypair.public_key().verify_transaction(&tx, &signed.signature));
        assert!(!keypair.public_key().verify_personal_message(&tx, &signed.signature));
    }
}
