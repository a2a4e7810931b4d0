use crate::error::CryptoError;
use crate::keypair::{encode_iota_private_key, Signer, PRIVATE_KEY_SIZE};
use crate::public_key::PublicKey;
use crate::scheme::SignatureScheme;
use p256::ecdsa::signature::{Signer as _, Verifier as _};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// Secp256r1 (NIST P-256) ECDSA keypair.
///
/// Signatures are normalized to low-S; the chain rejects the high-S form.
#[derive(Clone)]
pub struct Secp256r1Keypair {
    signing_key: SigningKey,
}

impl Secp256r1Keypair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    pub fn from_secret_key(secret: &[u8]) -> Result<Self, CryptoError> {
        if secret.len() != PRIVATE_KEY_SIZE {
            return Err(CryptoError::InvalidPrivateKey);
        }
        let signing_key = SigningKey::from_slice(secret).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_SIZE]> {
        let mut bytes = Zeroizing::new([0u8; PRIVATE_KEY_SIZE]);
        bytes.copy_from_slice(&self.signing_key.to_bytes());
        bytes
    }

    pub fn secret_key(&self) -> Result<String, CryptoError> {
        encode_iota_private_key(&self.secret_key_bytes()[..], SignatureScheme::Secp256r1)
    }
}

impl Signer for Secp256r1Keypair {
    fn scheme(&self) -> SignatureScheme {
        SignatureScheme::Secp256r1
    }

    fn public_key(&self) -> PublicKey {
        let point = self.signing_key.verifying_key().to_encoded_point(true);
        PublicKey::from_trusted(SignatureScheme::Secp256r1, point.as_bytes().to_vec())
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing_key.sign(data);
        let signature = signature.normalize_s().unwrap_or(signature);
        signature.to_bytes().to_vec()
    }
}

impl fmt::Debug for Secp256r1Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256r1Keypair({})", self.address())
    }
}

pub fn verify(public_key: &[u8], data: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    let key = VerifyingKey::from_sec1_bytes(public_key).map_err(|_| CryptoError::InvalidPublicKey)?;
    let signature = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;
    key.verify(data, &signature)
        .map_err(|_| CryptoError::InvalidSignature)
}
